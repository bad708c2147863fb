// ==========================================
// BOM 零件核对系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 流程: 图片检测 → BOM 比对 → 复核定稿 → 差异项跟踪
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 比对规则
pub mod engine;

// 外部协作方 - 检测服务/图片存储
pub mod provider;

// 导入层 - BOM 文件
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ActionItemStatus, ItemType, RefinalizePolicy};

// 领域实体
pub use domain::{
    ActionableItem, BomEntry, ComparisonResult, DetectionSummary, NewActionableItem,
    ShortageItem, SurplusItem,
};

// 引擎
pub use engine::{ActionItemPlanner, ReconciliationEngine};

// API
pub use api::{ActionItemApi, ApiError, ApiResult, BomApi, DetectionApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "BOM 零件核对系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

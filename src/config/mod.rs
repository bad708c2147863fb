// ==========================================
// BOM 零件核对系统 - 配置层
// ==========================================
// 职责: 系统配置管理,支持环境变量覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;

pub use config_manager::{config_keys, defaults, ConfigManager};

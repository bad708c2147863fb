// ==========================================
// BOM 零件核对系统 - API 层
// ==========================================
// 职责: 用例门面,负责校验与错误映射,供命令行/服务层调用
// ==========================================

pub mod action_item_api;
pub mod bom_api;
pub mod detection_api;
pub mod error;
pub mod validator;

// 重导出核心类型
pub use action_item_api::ActionItemApi;
pub use bom_api::BomApi;
pub use detection_api::DetectionApi;
pub use error::{ApiError, ApiResult, ErrorResponse};

// ==========================================
// BOM 零件核对系统 - 应用层
// ==========================================
// 职责: 组装仓储、外部协作方与 API 实例
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};

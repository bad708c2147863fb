// ==========================================
// BOM 零件核对系统 - 引擎层
// ==========================================
// 职责: 业务规则（比对、差异项规划）
// 红线: 引擎无状态、不访问数据库
// ==========================================

pub mod action_item_planner;
pub mod reconciliation;

pub use action_item_planner::ActionItemPlanner;
pub use reconciliation::ReconciliationEngine;

// ==========================================
// BOM 零件核对系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod action_item_repo;
pub mod bom_repo;
pub mod comparison_repo;
pub mod error;
pub mod finalization_repo;

// 重导出核心仓储
pub use action_item_repo::ActionItemRepository;
pub use bom_repo::BomRepository;
pub use comparison_repo::{ComparisonRecord, ComparisonRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use finalization_repo::FinalizationRepository;

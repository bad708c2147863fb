// ==========================================
// BOM 零件核对系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_item;
pub mod bom;
pub mod comparison;
pub mod detection;
pub mod types;

// 重导出核心类型
pub use action_item::{ActionableItem, FinalizeOutcome, FinalizeRequest, NewActionableItem, ResetOutcome};
pub use bom::{BomEntry, BomEntryWithStatus};
pub use comparison::{ComparisonResult, ShortageItem, SurplusItem};
pub use detection::{DetectionResponse, DetectionSummary};
pub use types::{ActionItemStatus, ItemType, RefinalizePolicy};

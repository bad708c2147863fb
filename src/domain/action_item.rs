// ==========================================
// BOM 零件核对系统 - 差异处理项领域模型
// ==========================================
// 生成: 仅由定稿批量生成（同一批次同一 bom_code）
// 修改: 仅状态字段可更新
// 删除: 仅由所属 bom_code 的重置删除
// ==========================================

use crate::domain::types::{ActionItemStatus, ItemType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ActionableItem - 已落库的差异处理项
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionableItem {
    pub id: i64,
    pub bom_code: String,
    pub part_name: String,
    pub item_type: ItemType,
    pub quantity_diff: i64, // 恒 > 0
    pub status: ActionItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// NewActionableItem - 待定稿的差异项
// ==========================================
// 定稿请求中的单条记录；落库时状态固定为 BARU_MASUK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActionableItem {
    pub bom_code: String,
    pub part_name: String,
    pub item_type: ItemType,
    pub quantity_diff: i64,
}

impl NewActionableItem {
    pub fn new(bom_code: &str, part_name: &str, item_type: ItemType, quantity_diff: i64) -> Self {
        Self {
            bom_code: bom_code.to_string(),
            part_name: part_name.to_string(),
            item_type,
            quantity_diff,
        }
    }
}

/// 定稿请求体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinalizeRequest {
    #[serde(default)]
    pub items: Vec<NewActionableItem>,
}

/// 定稿结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeOutcome {
    pub bom_code: String,
    pub inserted_count: usize,
    /// 比对结果的 is_finalized 是否被置位（无比对结果时为 false）
    pub comparison_flagged: bool,
}

/// 重置结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetOutcome {
    pub bom_code: String,
    pub deleted_items: usize,
    pub deleted_results: usize,
}

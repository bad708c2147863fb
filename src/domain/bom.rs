// ==========================================
// BOM 零件核对系统 - BOM 领域模型
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// BomEntry - BOM 明细行
// ==========================================
// 同一 bom_code 下每个零件一行；比对引擎只读
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomEntry {
    #[serde(default)]
    pub id: i64,                  // 主键（新建时为 0）
    pub bom_code: String,         // BOM 编码
    #[serde(default)]
    pub part_reference: String,   // 零件参考号
    pub part_name: String,        // 零件名称（与检测类别名精确匹配）
    #[serde(default)]
    pub part_description: String, // 零件描述
    pub quantity: i64,            // 需求数量 (>0)
}

impl BomEntry {
    /// 创建新的 BOM 明细（未落库，id=0）
    pub fn new(bom_code: &str, part_name: &str, quantity: i64) -> Self {
        Self {
            id: 0,
            bom_code: bom_code.to_string(),
            part_reference: String::new(),
            part_name: part_name.to_string(),
            part_description: String::new(),
            quantity,
        }
    }
}

// ==========================================
// BomEntryWithStatus - 带检测/定稿状态的 BOM 明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomEntryWithStatus {
    #[serde(flatten)]
    pub entry: BomEntry,
    pub has_detection_result: bool, // 是否存在比对结果
    pub is_finalized: bool,         // 比对结果是否已定稿
}

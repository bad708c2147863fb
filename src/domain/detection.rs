// ==========================================
// BOM 零件核对系统 - 检测结果领域模型
// ==========================================
// 对齐检测服务响应格式（snake_case 字段）
// ==========================================

use serde::{Deserialize, Serialize};

/// 单张图片中某一零件类别的检测汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSummary {
    pub class_name: String,
    pub quantity: i64,
    pub avg_confidence: f64,
}

impl DetectionSummary {
    pub fn new(class_name: &str, quantity: i64, avg_confidence: f64) -> Self {
        Self {
            class_name: class_name.to_string(),
            quantity,
            avg_confidence,
        }
    }

    /// 检查数值范围: quantity ≥ 0, avg_confidence ∈ [0, 1]
    pub fn is_well_formed(&self) -> bool {
        self.quantity >= 0
            && self.avg_confidence.is_finite()
            && (0.0..=1.0).contains(&self.avg_confidence)
    }
}

/// 检测服务响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    #[serde(default)]
    pub summary: Vec<DetectionSummary>,
    /// 标注后图片（base64 Data URL）
    #[serde(default)]
    pub annotated_image: String,
}

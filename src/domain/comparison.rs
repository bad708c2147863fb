// ==========================================
// BOM 零件核对系统 - 比对结果领域模型
// ==========================================
// 持久化格式: camelCase JSON（detection_results.comparison_result_json）
// ==========================================

use serde::{Deserialize, Deserializer, Serialize};

/// 缺件明细: shortage = required - detected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortageItem {
    pub part_name: String,
    pub required: i64,
    pub detected: i64,
    pub shortage: i64,
}

/// 多件明细: surplus = detected - required
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurplusItem {
    pub part_name: String,
    pub detected: i64,
    pub required: i64,
    pub surplus: i64,
}

// ==========================================
// ComparisonResult - 比对结果
// ==========================================
// 每个 bom_code 仅一条当前结果；is_finalized 只由定稿置位
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub shortage_items: Vec<ShortageItem>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub surplus_items: Vec<SurplusItem>,
    #[serde(default)]
    pub original_image: String,
    #[serde(default)]
    pub annotated_image: String,
    #[serde(default)]
    pub is_finalized: bool,
}

impl ComparisonResult {
    /// 是否完全匹配（无缺件、无多件）
    pub fn is_exact_match(&self) -> bool {
        self.shortage_items.is_empty() && self.surplus_items.is_empty()
    }

    /// 差异零件总数
    pub fn discrepancy_count(&self) -> usize {
        self.shortage_items.len() + self.surplus_items.len()
    }
}

/// 历史记录中空列表可能被存为 null
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_result_wire_format() {
        let result = ComparisonResult {
            shortage_items: vec![ShortageItem {
                part_name: "Screw-M3".to_string(),
                required: 10,
                detected: 7,
                shortage: 3,
            }],
            surplus_items: vec![],
            original_image: "data:image/png;base64,AA==".to_string(),
            annotated_image: "data:image/jpeg;base64,AA==".to_string(),
            is_finalized: false,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["shortageItems"][0]["partName"], "Screw-M3");
        assert_eq!(value["shortageItems"][0]["shortage"], 3);
        assert_eq!(value["surplusItems"], serde_json::json!([]));
        assert_eq!(value["isFinalized"], false);
        assert!(value.get("originalImage").is_some());
        assert!(!result.is_exact_match());
        assert_eq!(result.discrepancy_count(), 1);
    }

    #[test]
    fn test_null_or_missing_lists_deserialize_as_empty() {
        let parsed: ComparisonResult =
            serde_json::from_str(r#"{"shortageItems":null,"originalImage":"","annotatedImage":""}"#)
                .unwrap();
        assert!(parsed.shortage_items.is_empty());
        assert!(parsed.surplus_items.is_empty());
        assert!(!parsed.is_finalized);
    }
}

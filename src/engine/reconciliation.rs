// ==========================================
// BOM 零件核对系统 - 比对引擎
// ==========================================
// 输入: 需求数量 (part_name → qty) + 检测汇总
// 输出: 缺件/多件列表（均按 part_name 升序）
// 红线: 无状态引擎,纯函数,永不失败
// ==========================================

use crate::domain::comparison::{ComparisonResult, ShortageItem, SurplusItem};
use crate::domain::detection::DetectionSummary;
use std::collections::BTreeMap;

// ==========================================
// ReconciliationEngine - 比对引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    /// 创建新的比对引擎
    pub fn new() -> Self {
        Self
    }

    /// 比对需求与检测结果
    ///
    /// # 参数
    /// - `required`: 零件名 → 需求数量
    /// - `detected`: 检测汇总（同名类别数量累加）
    ///
    /// # 返回
    /// 仅含 shortage_items / surplus_items 的 ComparisonResult；
    /// 图片字段为空、is_finalized=false，由调用方补全
    ///
    /// # 规则
    /// - 未检测到 → 缺件（detected=0）
    /// - 检测数 < 需求数 → 缺件
    /// - 检测数 > 需求数 → 多件
    /// - 相等 → 不输出
    /// - 检测到但不在 BOM 中 → 多件（required=0）
    pub fn compare(
        &self,
        required: &BTreeMap<String, i64>,
        detected: &[DetectionSummary],
    ) -> ComparisonResult {
        let detected_qty = Self::aggregate_detections(detected);

        let mut shortage_items = Vec::new();
        let mut surplus_items = Vec::new();

        // BTreeMap 按键有序迭代，输出天然按 part_name 升序
        for (part_name, &required_qty) in required {
            match detected_qty.get(part_name) {
                None => shortage_items.push(ShortageItem {
                    part_name: part_name.clone(),
                    required: required_qty,
                    detected: 0,
                    shortage: required_qty,
                }),
                Some(&found) if found < required_qty => shortage_items.push(ShortageItem {
                    part_name: part_name.clone(),
                    required: required_qty,
                    detected: found,
                    shortage: required_qty - found,
                }),
                Some(&found) if found > required_qty => surplus_items.push(SurplusItem {
                    part_name: part_name.clone(),
                    detected: found,
                    required: required_qty,
                    surplus: found - required_qty,
                }),
                Some(_) => {}
            }
        }

        for (class_name, &found) in &detected_qty {
            if !required.contains_key(class_name) {
                surplus_items.push(SurplusItem {
                    part_name: class_name.clone(),
                    detected: found,
                    required: 0,
                    surplus: found,
                });
            }
        }

        // 两段来源合并后需重新排序
        surplus_items.sort_by(|a, b| a.part_name.cmp(&b.part_name));

        tracing::debug!(
            required_parts = required.len(),
            detected_classes = detected_qty.len(),
            shortages = shortage_items.len(),
            surpluses = surplus_items.len(),
            "比对完成"
        );

        ComparisonResult {
            shortage_items,
            surplus_items,
            ..ComparisonResult::default()
        }
    }

    /// 按类别名累加检测数量（累加饱和于 i64::MAX）
    fn aggregate_detections(detected: &[DetectionSummary]) -> BTreeMap<String, i64> {
        let mut map: BTreeMap<String, i64> = BTreeMap::new();
        for summary in detected {
            let total = map.entry(summary.class_name.clone()).or_insert(0);
            *total = total.saturating_add(summary.quantity);
        }
        map
    }
}

// ==========================================
// BOM 零件核对系统 - 差异项规划器
// ==========================================
// 职责: 将人工审核后的比对结果转换为待定稿差异项
// 红线: quantity_diff 恒 > 0（零差异不生成差异项）
// ==========================================

use crate::domain::action_item::NewActionableItem;
use crate::domain::comparison::ComparisonResult;
use crate::domain::types::ItemType;
use std::collections::BTreeSet;

#[derive(Debug, Default, Clone, Copy)]
pub struct ActionItemPlanner;

impl ActionItemPlanner {
    pub fn new() -> Self {
        Self
    }

    /// 为比对结果中全部差异生成差异项（缺件在前，多件在后，各自按零件名升序）
    pub fn plan(&self, bom_code: &str, result: &ComparisonResult) -> Vec<NewActionableItem> {
        self.plan_filtered(bom_code, result, |_| true)
    }

    /// 仅为选中的零件生成差异项
    ///
    /// 未出现在比对结果中的零件名会被忽略
    pub fn plan_selected(
        &self,
        bom_code: &str,
        result: &ComparisonResult,
        selected_parts: &[String],
    ) -> Vec<NewActionableItem> {
        let selected: BTreeSet<&str> = selected_parts.iter().map(|s| s.as_str()).collect();
        self.plan_filtered(bom_code, result, |name| selected.contains(name))
    }

    fn plan_filtered<F>(&self, bom_code: &str, result: &ComparisonResult, keep: F) -> Vec<NewActionableItem>
    where
        F: Fn(&str) -> bool,
    {
        let shortages = result
            .shortage_items
            .iter()
            .filter(|s| s.shortage > 0 && keep(&s.part_name))
            .map(|s| NewActionableItem::new(bom_code, &s.part_name, ItemType::Shortage, s.shortage));

        let surpluses = result
            .surplus_items
            .iter()
            .filter(|s| s.surplus > 0 && keep(&s.part_name))
            .map(|s| NewActionableItem::new(bom_code, &s.part_name, ItemType::Surplus, s.surplus));

        shortages.chain(surpluses).collect()
    }
}

// ==========================================
// BOM 零件核对系统 - 差异处理项 API
// ==========================================
// 职责: 定稿（批量生成差异项）、状态流转、查询
// 状态: BARU_MASUK ⇄ DITINDAKLANJUTI ⇄ SELESAI（显式更新可设任意合法状态）
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{parse_status, validate_bom_code, validate_finalize_batch};
use crate::domain::action_item::{ActionableItem, FinalizeOutcome, NewActionableItem};
use crate::domain::types::RefinalizePolicy;
use crate::engine::ActionItemPlanner;
use crate::i18n::t_with_args;
use crate::repository::{ActionItemRepository, ComparisonRepository, FinalizationRepository};

// ==========================================
// ActionItemApi - 差异处理项 API
// ==========================================
pub struct ActionItemApi {
    action_item_repo: Arc<ActionItemRepository>,
    comparison_repo: Arc<ComparisonRepository>,
    finalization_repo: Arc<FinalizationRepository>,
    planner: ActionItemPlanner,
    policy: RefinalizePolicy,
}

impl ActionItemApi {
    pub fn new(
        action_item_repo: Arc<ActionItemRepository>,
        comparison_repo: Arc<ComparisonRepository>,
        finalization_repo: Arc<FinalizationRepository>,
        policy: RefinalizePolicy,
    ) -> Self {
        Self {
            action_item_repo,
            comparison_repo,
            finalization_repo,
            planner: ActionItemPlanner::new(),
            policy,
        }
    }

    pub fn policy(&self) -> RefinalizePolicy {
        self.policy
    }

    /// 定稿
    ///
    /// # 参数
    /// - items: 复核后选中的差异项（须同属一个 bom_code）
    ///
    /// # 返回
    /// - Ok(FinalizeOutcome)
    /// - Err(ValidationError): 空批次、编码不一致、非正差异数量
    /// - Err(AlreadyFinalized): 重复定稿且策略为 REJECT
    pub fn finalize(&self, items: &[NewActionableItem]) -> ApiResult<FinalizeOutcome> {
        let bom_code = validate_finalize_batch(items)?;

        let outcome = self.finalization_repo.finalize(&bom_code, items, self.policy)?;
        tracing::info!(
            bom_code = %outcome.bom_code,
            inserted = outcome.inserted_count,
            flagged = outcome.comparison_flagged,
            policy = %self.policy,
            "定稿完成"
        );
        Ok(outcome)
    }

    /// 由当前比对结果生成差异项并定稿
    ///
    /// # 参数
    /// - selected_parts: None 表示全部差异；Some 时仅定稿选中的零件
    pub fn finalize_from_result(
        &self,
        bom_code: &str,
        selected_parts: Option<&[String]>,
    ) -> ApiResult<FinalizeOutcome> {
        validate_bom_code(bom_code)?;
        let result = self.comparison_repo.find_result(bom_code)?.ok_or_else(|| {
            ApiError::NotFound(t_with_args("error.result_not_found", &[("bom_code", bom_code)]))
        })?;

        let items = match selected_parts {
            Some(parts) => self.planner.plan_selected(bom_code, &result, parts),
            None => self.planner.plan(bom_code, &result),
        };
        if items.is_empty() {
            return Err(ApiError::BusinessRuleViolation(t_with_args(
                "error.nothing_to_finalize",
                &[("bom_code", bom_code)],
            )));
        }

        self.finalize(&items)
    }

    /// 查询全部差异项（状态升序，创建时间倒序）
    pub fn list(&self) -> ApiResult<Vec<ActionableItem>> {
        Ok(self.action_item_repo.list_all()?)
    }

    pub fn list_by_bom_code(&self, bom_code: &str) -> ApiResult<Vec<ActionableItem>> {
        validate_bom_code(bom_code)?;
        Ok(self.action_item_repo.find_by_bom_code(bom_code)?)
    }

    /// 更新状态
    ///
    /// 非法状态字面值在任何写入之前拒绝,updated_at 不变
    pub fn update_status(&self, id: i64, raw_status: &str) -> ApiResult<ActionableItem> {
        let status = parse_status(raw_status)?;

        let rows = self.action_item_repo.update_status(id, status)?;
        if rows == 0 {
            return Err(ApiError::NotFound(t_with_args(
                "error.item_not_found",
                &[("id", &id.to_string())],
            )));
        }
        tracing::info!(id, status = %status, "差异项状态已更新");

        self.action_item_repo.find_by_id(id)?.ok_or_else(|| {
            ApiError::NotFound(t_with_args("error.item_not_found", &[("id", &id.to_string())]))
        })
    }
}

// ==========================================
// BOM 零件核对系统 - 检测比对 API
// ==========================================
// 职责: 图片检测 → 与 BOM 比对 → 覆盖写入当前比对结果
// 约束: 检测结果与 BOM 数据均就绪之前不写任何数据
//       检测超时/失败不影响已存结果
// ==========================================

use std::sync::Arc;
use std::time::Duration;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{validate_bom_code, validate_image};
use crate::domain::action_item::ResetOutcome;
use crate::domain::comparison::ComparisonResult;
use crate::engine::ReconciliationEngine;
use crate::i18n::t_with_args;
use crate::provider::{to_data_url, DetectionProvider, ImageStore, ProviderError};
use crate::repository::{BomRepository, ComparisonRepository, FinalizationRepository};

// ==========================================
// DetectionApi - 检测比对 API
// ==========================================
pub struct DetectionApi {
    bom_repo: Arc<BomRepository>,
    comparison_repo: Arc<ComparisonRepository>,
    finalization_repo: Arc<FinalizationRepository>,
    provider: Arc<dyn DetectionProvider>,
    image_store: Option<Arc<dyn ImageStore>>,
    engine: ReconciliationEngine,
    timeout: Duration,
}

impl DetectionApi {
    pub fn new(
        bom_repo: Arc<BomRepository>,
        comparison_repo: Arc<ComparisonRepository>,
        finalization_repo: Arc<FinalizationRepository>,
        provider: Arc<dyn DetectionProvider>,
        timeout: Duration,
    ) -> Self {
        Self {
            bom_repo,
            comparison_repo,
            finalization_repo,
            provider,
            image_store: None,
            engine: ReconciliationEngine::new(),
            timeout,
        }
    }

    /// 配置上传图片存储
    pub fn with_image_store(mut self, image_store: Arc<dyn ImageStore>) -> Self {
        self.image_store = Some(image_store);
        self
    }

    /// 检测并比对
    ///
    /// # 流程
    /// 1. 校验 bom_code 与图片
    /// 2. 原图编码为 Data URL
    /// 3. 调用检测服务（超时受控；丢弃 future 即取消）
    /// 4. 读取需求数量并比对
    /// 5. 保存原图并覆盖写入比对结果（写入失败时回收原图）
    ///
    /// # 返回
    /// - Ok(ComparisonResult): is_finalized 为该 BOM 编码当前的定稿标记（覆盖写入不改变它）
    /// - Err(UpstreamUnavailable): 检测服务超时/不可达/响应异常
    pub async fn detect_and_compare(
        &self,
        bom_code: &str,
        image: &[u8],
        file_name: &str,
    ) -> ApiResult<ComparisonResult> {
        validate_bom_code(bom_code)?;
        validate_image(image)?;

        let original_image = to_data_url(image);

        let detection = match tokio::time::timeout(self.timeout, self.provider.detect(image, file_name)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                tracing::warn!(bom_code = %bom_code, error = %err, "检测服务调用失败");
                return Err(err.into());
            }
            Err(_) => {
                tracing::warn!(bom_code = %bom_code, timeout_secs = self.timeout.as_secs(), "检测服务超时");
                return Err(ProviderError::Timeout(self.timeout.as_secs()).into());
            }
        };

        let required = self.bom_repo.find_required_quantities(bom_code)?;
        let mut result = self.engine.compare(&required, &detection.summary);
        result.original_image = original_image;
        result.annotated_image = detection.annotated_image;

        let image_ref = match &self.image_store {
            Some(store) => Some(store.store(image, file_name)?),
            None => None,
        };

        match self
            .comparison_repo
            .upsert(bom_code, &result, image_ref.as_deref())
        {
            Ok(is_finalized) => result.is_finalized = is_finalized,
            Err(err) => {
                // 结果未落库，回收已保存的原图
                if let (Some(store), Some(reference)) = (&self.image_store, &image_ref) {
                    if let Err(remove_err) = store.remove(reference) {
                        tracing::warn!(reference = %reference, error = %remove_err, "原图回收失败");
                    }
                }
                return Err(err.into());
            }
        }

        tracing::info!(
            bom_code = %bom_code,
            shortages = result.shortage_items.len(),
            surpluses = result.surplus_items.len(),
            "比对结果已保存"
        );
        Ok(result)
    }

    /// 查询当前比对结果
    pub fn get_result(&self, bom_code: &str) -> ApiResult<ComparisonResult> {
        validate_bom_code(bom_code)?;
        self.comparison_repo.find_result(bom_code)?.ok_or_else(|| {
            ApiError::NotFound(t_with_args("error.result_not_found", &[("bom_code", bom_code)]))
        })
    }

    /// 重置: 删除差异项与比对结果（BOM 明细保留）
    pub fn reset(&self, bom_code: &str) -> ApiResult<ResetOutcome> {
        validate_bom_code(bom_code)?;
        let outcome = self.finalization_repo.reset(bom_code)?;
        tracing::info!(
            bom_code = %bom_code,
            deleted_items = outcome.deleted_items,
            deleted_results = outcome.deleted_results,
            "BOM 比对已重置"
        );
        Ok(outcome)
    }
}

// ==========================================
// BOM 零件核对系统 - 输入校验
// ==========================================
// 职责: 落库前拒绝非法输入（空批次、编码不一致、非法状态、非正数量）
// 所有错误消息按当前语言本地化
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_item::NewActionableItem;
use crate::domain::bom::BomEntry;
use crate::domain::types::ActionItemStatus;
use crate::i18n::{t, t_with_args};

/// 校验 BOM 编码非空
pub fn validate_bom_code(bom_code: &str) -> ApiResult<()> {
    if bom_code.trim().is_empty() {
        return Err(ApiError::InvalidInput(t("validation.bom_code_empty")));
    }
    Ok(())
}

/// 校验上传图片非空
pub fn validate_image(image: &[u8]) -> ApiResult<()> {
    if image.is_empty() {
        return Err(ApiError::InvalidInput(t("validation.image_empty")));
    }
    Ok(())
}

/// 校验单条 BOM 明细
pub fn validate_bom_entry(entry: &BomEntry) -> ApiResult<()> {
    validate_bom_code(&entry.bom_code)?;
    if entry.part_name.trim().is_empty() {
        return Err(ApiError::ValidationError(t("validation.part_name_empty")));
    }
    if entry.quantity <= 0 {
        return Err(ApiError::ValidationError(t_with_args(
            "validation.quantity_not_positive",
            &[("part", &entry.part_name)],
        )));
    }
    Ok(())
}

/// 校验定稿批次
///
/// # 规则
/// - 批次非空
/// - 首条的 bom_code 非空,其余条目与之一致
/// - 每条 part_name 非空、quantity_diff > 0
///
/// # 返回
/// - Ok(bom_code): 批次共享的 BOM 编码
pub fn validate_finalize_batch(items: &[NewActionableItem]) -> ApiResult<String> {
    let Some(first) = items.first() else {
        return Err(ApiError::ValidationError(t("validation.empty_batch")));
    };

    let bom_code = first.bom_code.as_str();
    if bom_code.trim().is_empty() {
        return Err(ApiError::ValidationError(t("validation.bom_code_empty")));
    }

    for item in items {
        if item.bom_code != bom_code {
            return Err(ApiError::ValidationError(t_with_args(
                "validation.bom_code_mismatch",
                &[("expected", bom_code), ("actual", &item.bom_code)],
            )));
        }
        if item.part_name.trim().is_empty() {
            return Err(ApiError::ValidationError(t("validation.part_name_empty")));
        }
        if item.quantity_diff <= 0 {
            return Err(ApiError::ValidationError(t_with_args(
                "validation.quantity_diff_not_positive",
                &[("part", &item.part_name)],
            )));
        }
    }

    Ok(bom_code.to_string())
}

/// 解析状态字面值（仅接受三个线上字面值）
pub fn parse_status(raw: &str) -> ApiResult<ActionItemStatus> {
    ActionItemStatus::from_str(raw).ok_or_else(|| {
        ApiError::ValidationError(t_with_args("validation.invalid_status", &[("status", raw)]))
    })
}

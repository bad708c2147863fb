// ==========================================
// BOM 零件核对系统 - API层错误类型
// ==========================================
// 职责: 定义调用方可见的错误分类,转换下层错误
// 消息在构造时按当前语言本地化
// ==========================================

use crate::i18n::{t, t_with_args};
use crate::importer::error::ImportError;
use crate::provider::error::ProviderError;
use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 校验错误（落库前拒绝）
    // ==========================================
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    ValidationError(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BusinessRuleViolation(String),

    #[error("{message}")]
    AlreadyFinalized { bom_code: String, message: String },

    // ==========================================
    // 外部依赖错误（可重试,已存结果不受影响）
    // ==========================================
    #[error("{0}")]
    UpstreamUnavailable(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("{0}")]
    DatabaseError(String),

    #[error("{0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("{0}")]
    ImportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("{0}")]
    InternalError(String),
}

/// 错误响应（返回给调用方）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn database(detail: impl std::fmt::Display) -> Self {
        ApiError::DatabaseError(t_with_args("error.database", &[("detail", &detail.to_string())]))
    }

    pub fn upstream(detail: impl std::fmt::Display) -> Self {
        ApiError::UpstreamUnavailable(t_with_args(
            "error.upstream_unavailable",
            &[("detail", &detail.to_string())],
        ))
    }

    pub fn internal(detail: impl std::fmt::Display) -> Self {
        ApiError::InternalError(t_with_args("error.internal", &[("detail", &detail.to_string())]))
    }

    pub fn already_finalized(bom_code: &str) -> Self {
        ApiError::AlreadyFinalized {
            bom_code: bom_code.to_string(),
            message: t_with_args("error.already_finalized", &[("bom_code", bom_code)]),
        }
    }

    /// 稳定的错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BusinessRuleViolation(_) => "BUSINESS_RULE_VIOLATION",
            ApiError::AlreadyFinalized { .. } => "ALREADY_FINALIZED",
            ApiError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::DatabaseTransactionError(_) => "DATABASE_TRANSACTION_ERROR",
            ApiError::ImportError(_) => "IMPORT_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// 是否为校验类错误（落库前拒绝）
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::InvalidInput(_) | ApiError::ValidationError(_))
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
            details: match self {
                ApiError::AlreadyFinalized { bom_code, .. } => {
                    Some(serde_json::json!({ "bom_code": bom_code }))
                }
                ApiError::UpstreamUnavailable(_) => Some(serde_json::json!({ "retryable": true })),
                _ => None,
            },
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::DatabaseTransactionError(msg) => ApiError::DatabaseTransactionError(
                t_with_args("error.database", &[("detail", &msg)]),
            ),
            RepositoryError::LockError(msg)
            | RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::CheckConstraintViolation(msg) => ApiError::database(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(msg)
            }
            RepositoryError::AlreadyFinalized { bom_code } => ApiError::already_finalized(&bom_code),
            RepositoryError::SerializationError(msg) => ApiError::internal(msg),
        }
    }
}

// ==========================================
// 从 ProviderError 转换
// ==========================================
impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidConfiguration(msg) | ProviderError::Storage(msg) => {
                ApiError::internal(msg)
            }
            other => ApiError::upstream(other),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => {
                ApiError::InvalidInput(t_with_args("import.file_not_found", &[("path", &path)]))
            }
            ImportError::UnsupportedFormat(ext) => {
                ApiError::InvalidInput(t_with_args("import.unsupported_format", &[("ext", &ext)]))
            }
            ImportError::EmptyFile => ApiError::ImportError(t("import.empty_file")),
            ImportError::Repository(repo_err) => repo_err.into(),
            other => ApiError::ImportError(t_with_args(
                "error.import_failed",
                &[("detail", &other.to_string())],
            )),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

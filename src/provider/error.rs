// ==========================================
// BOM 零件核对系统 - 外部协作方错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("检测服务超时 ({0} 秒)")]
    Timeout(u64),

    #[error("检测服务不可达: {0}")]
    Unreachable(String),

    #[error("检测服务返回错误状态 {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("检测服务响应无效: {0}")]
    InvalidResponse(String),

    #[error("检测服务配置无效: {0}")]
    InvalidConfiguration(String),

    #[error("图片存储失败: {0}")]
    Storage(String),
}

impl ProviderError {
    /// 是否可重试（配置错误与存储失败除外）
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            ProviderError::InvalidConfiguration(_) | ProviderError::Storage(_)
        )
    }
}

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        ProviderError::Storage(err.to_string())
    }
}

// ==========================================
// BOM 零件核对系统 - 检测服务客户端
// ==========================================
// 协议: multipart/form-data POST
//   file          图片字节
//   conf/iou      预测阈值
//   agnostic_nms  是否跨类别 NMS
// 响应: { summary: [{class_name, quantity, avg_confidence}], annotated_image }
// 错误响应: { error: "..." } + 4xx/5xx
// ==========================================

use crate::domain::detection::DetectionResponse;
use crate::provider::error::ProviderError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// 检测服务能力: 图片进,零件计数出
#[async_trait]
pub trait DetectionProvider: Send + Sync {
    async fn detect(&self, image: &[u8], file_name: &str) -> Result<DetectionResponse, ProviderError>;
}

/// 预测参数
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionOptions {
    pub conf: f64,
    pub iou: f64,
    pub agnostic_nms: bool,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            conf: 0.25,
            iou: 0.7,
            agnostic_nms: false,
        }
    }
}

// ==========================================
// HttpDetectionProvider - HTTP 检测服务
// ==========================================
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// 错误响应优先取 {"error": "..."}，否则使用原始响应体
fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("error").and_then(|v| v.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

pub struct HttpDetectionProvider {
    client: Client,
    api_url: String,
    options: DetectionOptions,
    timeout: Duration,
}

impl HttpDetectionProvider {
    pub fn new(
        api_url: &str,
        options: DetectionOptions,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(CONNECT_TIMEOUT))
            .build()
            .map_err(|e| ProviderError::InvalidConfiguration(format!("HTTP 客户端创建失败: {}", e)))?;
        Ok(Self {
            client,
            api_url: api_url.to_string(),
            options,
            timeout,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout.as_secs())
        } else {
            ProviderError::Unreachable(err.to_string())
        }
    }

    fn build_form(&self, image: &[u8], file_name: &str) -> Result<Form, ProviderError> {
        let part = Part::bytes(image.to_vec())
            .file_name(file_name.to_string())
            .mime_str(crate::provider::data_url::sniff_mime_type(image))
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(Form::new()
            .part("file", part)
            .text("conf", self.options.conf.to_string())
            .text("iou", self.options.iou.to_string())
            .text("agnostic_nms", self.options.agnostic_nms.to_string()))
    }
}

/// 解析响应体并校验数值范围
fn parse_response(body: &str) -> Result<DetectionResponse, ProviderError> {
    let response: DetectionResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

    if let Some(bad) = response.summary.iter().find(|s| !s.is_well_formed()) {
        return Err(ProviderError::InvalidResponse(format!(
            "{}: quantity={}, avg_confidence={}",
            bad.class_name, bad.quantity, bad.avg_confidence
        )));
    }

    // 同名类别合计不得溢出
    let mut totals: HashMap<&str, i64> = HashMap::new();
    for summary in &response.summary {
        let total = totals.entry(summary.class_name.as_str()).or_insert(0);
        *total = total.checked_add(summary.quantity).ok_or_else(|| {
            ProviderError::InvalidResponse(format!("{}: 数量合计溢出", summary.class_name))
        })?;
    }
    Ok(response)
}

#[async_trait]
impl DetectionProvider for HttpDetectionProvider {
    async fn detect(&self, image: &[u8], file_name: &str) -> Result<DetectionResponse, ProviderError> {
        let form = self.build_form(image, file_name)?;

        tracing::info!(url = %self.api_url, size = image.len(), "调用检测服务");
        let response = self
            .client
            .post(&self.api_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            tracing::warn!(status = %status, "检测服务返回错误状态");
            return Err(ProviderError::UpstreamStatus {
                status: status.as_u16(),
                body: upstream_error_message(&body),
            });
        }

        let parsed = parse_response(&body)?;
        tracing::debug!(classes = parsed.summary.len(), "检测服务响应解析完成");
        Ok(parsed)
    }
}

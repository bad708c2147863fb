// ==========================================
// BOM 零件核对系统 - 外部协作方
// ==========================================
// 检测服务: 图片 → 零件计数（唯一的长耗时调用）
// 图片存储: store(bytes) → 引用
// ==========================================

pub mod data_url;
pub mod detection;
pub mod error;
pub mod image_store;

pub use data_url::{sniff_mime_type, to_data_url};
pub use detection::{DetectionOptions, DetectionProvider, HttpDetectionProvider};
pub use error::ProviderError;
pub use image_store::{FsImageStore, ImageStore};

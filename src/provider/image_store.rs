// ==========================================
// BOM 零件核对系统 - 上传图片存储
// ==========================================

use crate::provider::error::ProviderError;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 图片存储: 保存原始字节并返回不透明引用
pub trait ImageStore: Send + Sync {
    fn store(&self, bytes: &[u8], file_name: &str) -> Result<String, ProviderError>;

    /// 删除 store 返回的引用对应的图片
    fn remove(&self, reference: &str) -> Result<(), ProviderError>;
}

// ==========================================
// FsImageStore - 本地目录存储
// ==========================================
// 文件名: <uuid>_<原文件名>，避免同名覆盖
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// 仅保留文件名部分，去除目录穿越
fn sanitize_file_name(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .trim();
    if base.is_empty() {
        "upload.bin".to_string()
    } else {
        base.to_string()
    }
}

impl ImageStore for FsImageStore {
    fn store(&self, bytes: &[u8], file_name: &str) -> Result<String, ProviderError> {
        std::fs::create_dir_all(&self.root)?;
        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_file_name(file_name));
        let path = self.root.join(stored_name);
        std::fs::write(&path, bytes)?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "图片已保存");
        Ok(path.to_string_lossy().into_owned())
    }

    fn remove(&self, reference: &str) -> Result<(), ProviderError> {
        let path = Path::new(reference);
        if !path.starts_with(&self.root) {
            return Err(ProviderError::Storage(format!(
                "引用不在存储目录下: {}",
                reference
            )));
        }
        std::fs::remove_file(path)?;
        tracing::debug!(path = %path.display(), "图片已删除");
        Ok(())
    }
}

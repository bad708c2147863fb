// ==========================================
// BOM 零件核对系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 所有仓储共享同一个 Arc<Mutex<Connection>>
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{ActionItemApi, BomApi, DetectionApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::provider::{DetectionProvider, FsImageStore, HttpDetectionProvider};
use crate::repository::{
    ActionItemRepository, BomRepository, ComparisonRepository, FinalizationRepository,
};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "BOM_RECONCILE_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// BOM 明细API
    pub bom_api: Arc<BomApi>,

    /// 检测比对API
    pub detection_api: Arc<DetectionApi>,

    /// 差异处理项API
    pub action_item_api: Arc<ActionItemApi>,
}

impl AppState {
    /// 创建新的AppState实例（检测服务使用配置中的 HTTP 地址）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::build(db_path, None)
    }

    /// 使用指定的检测服务实现创建AppState
    pub fn with_provider(db_path: String, provider: Arc<dyn DetectionProvider>) -> Result<Self, String> {
        Self::build(db_path, Some(provider))
    }

    fn build(db_path: String, provider: Option<Arc<dyn DetectionProvider>>) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置
        // ==========================================
        let config = Arc::new(ConfigManager::from_connection(conn.clone()));
        let timeout = config
            .detection_timeout()
            .map_err(|e| format!("读取配置失败: {}", e))?;
        let policy = config
            .refinalize_policy()
            .map_err(|e| format!("读取配置失败: {}", e))?;
        let upload_dir = config.upload_dir().map_err(|e| format!("读取配置失败: {}", e))?;

        let provider: Arc<dyn DetectionProvider> = match provider {
            Some(provider) => provider,
            None => {
                let api_url = config
                    .detection_api_url()
                    .map_err(|e| format!("读取配置失败: {}", e))?;
                let options = config
                    .detection_options()
                    .map_err(|e| format!("读取配置失败: {}", e))?;
                Arc::new(
                    HttpDetectionProvider::new(&api_url, options, timeout)
                        .map_err(|e| format!("无法创建检测服务客户端: {}", e))?,
                )
            }
        };

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let bom_repo = Arc::new(BomRepository::from_connection(conn.clone()));
        let comparison_repo = Arc::new(ComparisonRepository::new(conn.clone()));
        let action_item_repo = Arc::new(ActionItemRepository::new(conn.clone()));
        let finalization_repo = Arc::new(FinalizationRepository::new(conn));

        // ==========================================
        // 初始化API层
        // ==========================================
        let bom_api = Arc::new(BomApi::new(bom_repo.clone()));
        let detection_api = Arc::new(
            DetectionApi::new(
                bom_repo,
                comparison_repo.clone(),
                finalization_repo.clone(),
                provider,
                timeout,
            )
            .with_image_store(Arc::new(FsImageStore::new(upload_dir))),
        );
        let action_item_api = Arc::new(ActionItemApi::new(
            action_item_repo,
            comparison_repo,
            finalization_repo,
            policy,
        ));

        tracing::info!(policy = %policy, timeout_secs = timeout.as_secs(), "AppState初始化完成");

        Ok(Self {
            db_path,
            config,
            bom_api,
            detection_api,
            action_item_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先使用环境变量 BOM_RECONCILE_DB_PATH，否则使用用户数据目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./bom_reconcile.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("bom-reconcile");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("bom_reconcile.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_app_state_bootstraps_schema() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("state.db").to_string_lossy().to_string();

        let state = AppState::new(db_path.clone()).unwrap();
        assert_eq!(state.db_path, db_path);
        assert!(state.bom_api.list_with_status().unwrap().is_empty());
        assert!(state.action_item_api.list().unwrap().is_empty());
    }
}

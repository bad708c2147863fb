// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、API 组装、可编排的检测服务桩
// ==========================================
#![allow(dead_code)]

use async_trait::async_trait;
use bom_reconcile::api::{ActionItemApi, BomApi, DetectionApi};
use bom_reconcile::db::{init_schema, open_sqlite_connection};
use bom_reconcile::domain::detection::{DetectionResponse, DetectionSummary};
use bom_reconcile::domain::types::RefinalizePolicy;
use bom_reconcile::provider::{DetectionProvider, FsImageStore, ProviderError};
use bom_reconcile::repository::{
    ActionItemRepository, BomRepository, ComparisonRepository, FinalizationRepository,
};
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开一个新的共享连接
pub fn open_shared(db_path: &str) -> Arc<Mutex<Connection>> {
    Arc::new(Mutex::new(open_sqlite_connection(db_path).unwrap()))
}

// ==========================================
// 检测服务桩
// ==========================================

/// 按固定延迟返回固定结果
pub struct ScriptedProvider {
    pub summary: Vec<DetectionSummary>,
    pub annotated_image: String,
    pub delay: Duration,
}

impl ScriptedProvider {
    pub fn new(summary: Vec<DetectionSummary>) -> Self {
        Self {
            summary,
            annotated_image: "data:image/jpeg;base64,/9j/".to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl DetectionProvider for ScriptedProvider {
    async fn detect(&self, _image: &[u8], _file_name: &str) -> Result<DetectionResponse, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(DetectionResponse {
            summary: self.summary.clone(),
            annotated_image: self.annotated_image.clone(),
        })
    }
}

/// 总是失败的检测服务
pub struct FailingProvider;

#[async_trait]
impl DetectionProvider for FailingProvider {
    async fn detect(&self, _image: &[u8], _file_name: &str) -> Result<DetectionResponse, ProviderError> {
        Err(ProviderError::UpstreamStatus {
            status: 500,
            body: r#"{"error":"model not loaded"}"#.to_string(),
        })
    }
}

// ==========================================
// 测试环境
// ==========================================
pub struct TestEnv {
    pub _db_file: NamedTempFile,
    pub upload_dir: TempDir,
    pub db_path: String,
    pub conn: Arc<Mutex<Connection>>,
    pub bom_api: BomApi,
    pub action_item_api: ActionItemApi,
    pub bom_repo: Arc<BomRepository>,
    pub comparison_repo: Arc<ComparisonRepository>,
    pub finalization_repo: Arc<FinalizationRepository>,
}

impl TestEnv {
    pub fn new(policy: RefinalizePolicy) -> Self {
        bom_reconcile::logging::init_test();
        let (db_file, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);

        let bom_repo = Arc::new(BomRepository::from_connection(conn.clone()));
        let comparison_repo = Arc::new(ComparisonRepository::new(conn.clone()));
        let finalization_repo = Arc::new(FinalizationRepository::new(conn.clone()));
        let action_item_repo = Arc::new(ActionItemRepository::new(conn.clone()));

        Self {
            _db_file: db_file,
            upload_dir: TempDir::new().unwrap(),
            db_path,
            bom_api: BomApi::new(bom_repo.clone()),
            action_item_api: ActionItemApi::new(
                action_item_repo,
                comparison_repo.clone(),
                finalization_repo.clone(),
                policy,
            ),
            conn,
            bom_repo,
            comparison_repo,
            finalization_repo,
        }
    }

    /// 组装检测 API（每个测试可注入不同的检测服务桩）
    pub fn detection_api(&self, provider: Arc<dyn DetectionProvider>, timeout: Duration) -> DetectionApi {
        DetectionApi::new(
            self.bom_repo.clone(),
            self.comparison_repo.clone(),
            self.finalization_repo.clone(),
            provider,
            timeout,
        )
        .with_image_store(Arc::new(FsImageStore::new(self.upload_dir.path())))
    }
}

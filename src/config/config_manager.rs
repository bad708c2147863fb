// ==========================================
// BOM 零件核对系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value)
// 优先级: 环境变量 > config_kv > 内置默认值
// ==========================================

use crate::domain::types::RefinalizePolicy;
use crate::provider::detection::DetectionOptions;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
    // 构造时捕获的环境变量覆写（key → value）
    env_overrides: HashMap<String, String>,
}

impl ConfigManager {
    /// 从已有连接创建,并读取进程环境变量作为覆写
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        let env_overrides = config_keys::ENV_BINDINGS
            .iter()
            .filter_map(|(key, env)| {
                std::env::var(env)
                    .ok()
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| (key.to_string(), v))
            })
            .collect();
        Self { conn, env_overrides }
    }

    /// 使用显式覆写表创建（不读取进程环境）
    pub fn with_overrides(conn: Arc<Mutex<Connection>>, env_overrides: HashMap<String, String>) -> Self {
        Self { conn, env_overrides }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取配置值（环境变量优先）
    pub fn get_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        if let Some(value) = self.env_overrides.get(key) {
            return Ok(Some(value.clone()));
        }
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn get_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self.get_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取并解析；格式错误时告警并回退默认值
    fn get_parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> RepositoryResult<T> {
        let Some(raw) = self.get_value(key)? else {
            return Ok(default);
        };
        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(config_key = key, value = %raw, "配置值格式错误，使用默认值");
                Ok(default)
            }
        }
    }

    /// 写入（覆盖）配置值
    pub fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, Utc::now()],
        )?;
        tracing::info!(config_key = key, "配置已更新");
        Ok(())
    }

    /// 获取 config_kv 中全部配置的快照（JSON）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }
        Ok(serde_json::to_string(&json!(config_map))?)
    }

    // ===== 检测服务 =====

    pub fn detection_api_url(&self) -> RepositoryResult<String> {
        self.get_or_default(config_keys::DETECTION_API_URL, defaults::DETECTION_API_URL)
    }

    pub fn detection_timeout(&self) -> RepositoryResult<Duration> {
        let secs = self.get_parsed(config_keys::DETECTION_TIMEOUT_SECS, defaults::DETECTION_TIMEOUT_SECS)?;
        Ok(Duration::from_secs(secs.max(1)))
    }

    pub fn detection_options(&self) -> RepositoryResult<DetectionOptions> {
        let fallback = DetectionOptions::default();
        Ok(DetectionOptions {
            conf: self.get_parsed(config_keys::DETECTION_CONF, fallback.conf)?,
            iou: self.get_parsed(config_keys::DETECTION_IOU, fallback.iou)?,
            agnostic_nms: self.get_parsed(config_keys::DETECTION_AGNOSTIC_NMS, fallback.agnostic_nms)?,
        })
    }

    // ===== 存储 / 定稿 / 界面 =====

    pub fn upload_dir(&self) -> RepositoryResult<PathBuf> {
        Ok(PathBuf::from(
            self.get_or_default(config_keys::UPLOAD_DIR, defaults::UPLOAD_DIR)?,
        ))
    }

    pub fn refinalize_policy(&self) -> RepositoryResult<RefinalizePolicy> {
        let Some(raw) = self.get_value(config_keys::REFINALIZE_POLICY)? else {
            return Ok(RefinalizePolicy::default());
        };
        Ok(RefinalizePolicy::from_str(&raw).unwrap_or_else(|| {
            tracing::warn!(value = %raw, "未知的重复定稿策略，使用 REJECT");
            RefinalizePolicy::default()
        }))
    }

    pub fn locale(&self) -> RepositoryResult<String> {
        self.get_or_default(config_keys::APP_LOCALE, defaults::APP_LOCALE)
    }
}

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const DETECTION_API_URL: &str = "detection.api_url";
    pub const DETECTION_TIMEOUT_SECS: &str = "detection.timeout_secs";
    pub const DETECTION_CONF: &str = "detection.conf";
    pub const DETECTION_IOU: &str = "detection.iou";
    pub const DETECTION_AGNOSTIC_NMS: &str = "detection.agnostic_nms";
    pub const UPLOAD_DIR: &str = "upload.dir";
    pub const REFINALIZE_POLICY: &str = "finalize.refinalize_policy";
    pub const APP_LOCALE: &str = "app.locale";

    /// 可由环境变量覆写的键
    pub const ENV_BINDINGS: &[(&str, &str)] = &[
        (DETECTION_API_URL, "BOM_DETECTION_API_URL"),
        (DETECTION_TIMEOUT_SECS, "BOM_DETECTION_TIMEOUT_SECS"),
        (UPLOAD_DIR, "BOM_UPLOAD_DIR"),
        (APP_LOCALE, "BOM_LOCALE"),
    ];
}

pub mod defaults {
    pub const DETECTION_API_URL: &str = "http://localhost:5001/predict";
    pub const DETECTION_TIMEOUT_SECS: u64 = 120;
    pub const UPLOAD_DIR: &str = "./uploads";
    pub const APP_LOCALE: &str = "zh-CN";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn setup(overrides: &[(&str, &str)]) -> ConfigManager {
        let conn = Arc::new(Mutex::new(open_in_memory().unwrap()));
        let overrides = overrides
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigManager::with_overrides(conn, overrides)
    }

    #[test]
    fn test_defaults_when_nothing_stored() {
        let config = setup(&[]);
        assert_eq!(config.detection_api_url().unwrap(), "http://localhost:5001/predict");
        assert_eq!(config.detection_timeout().unwrap(), Duration::from_secs(120));
        assert_eq!(config.detection_options().unwrap(), DetectionOptions::default());
        assert_eq!(config.upload_dir().unwrap(), PathBuf::from("./uploads"));
        assert_eq!(config.refinalize_policy().unwrap(), RefinalizePolicy::Reject);
        assert_eq!(config.locale().unwrap(), "zh-CN");
    }

    #[test]
    fn test_stored_values_override_defaults() {
        let config = setup(&[]);
        config.set(config_keys::DETECTION_CONF, "0.4").unwrap();
        config.set(config_keys::DETECTION_AGNOSTIC_NMS, "true").unwrap();
        config.set(config_keys::REFINALIZE_POLICY, "append").unwrap();

        let options = config.detection_options().unwrap();
        assert_eq!(options.conf, 0.4);
        assert!(options.agnostic_nms);
        assert_eq!(config.refinalize_policy().unwrap(), RefinalizePolicy::Append);
    }

    #[test]
    fn test_env_overrides_beat_stored_values() {
        let config = setup(&[(config_keys::DETECTION_API_URL, "http://detector:9000/predict")]);
        config.set(config_keys::DETECTION_API_URL, "http://stored/predict").unwrap();
        assert_eq!(config.detection_api_url().unwrap(), "http://detector:9000/predict");
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let config = setup(&[]);
        config.set(config_keys::DETECTION_TIMEOUT_SECS, "soon").unwrap();
        config.set(config_keys::REFINALIZE_POLICY, "SOMETIMES").unwrap();
        assert_eq!(config.detection_timeout().unwrap(), Duration::from_secs(120));
        assert_eq!(config.refinalize_policy().unwrap(), RefinalizePolicy::Reject);
    }

    #[test]
    fn test_snapshot_lists_stored_values() {
        let config = setup(&[]);
        config.set("b.key", "2").unwrap();
        config.set("a.key", "1").unwrap();
        config.set("a.key", "3").unwrap();

        let snapshot: serde_json::Value =
            serde_json::from_str(&config.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot, json!({"a.key": "3", "b.key": "2"}));
    }
}

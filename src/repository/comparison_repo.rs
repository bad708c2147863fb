// ==========================================
// BOM 零件核对系统 - 比对结果数据仓储
// ==========================================
// 表: detection_results（主键 bom_code）
// 语义: put(bom_code, result) 覆盖旧值,最后提交者生效
// ==========================================

use crate::domain::comparison::ComparisonResult;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// 比对结果落库记录
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRecord {
    pub bom_code: String,
    /// is_finalized 以数据库列为准
    pub result: ComparisonResult,
    /// 原图在图片存储中的引用（未配置存储时为空）
    pub original_image_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// ComparisonRepository - 比对结果仓储
// ==========================================
pub struct ComparisonRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ComparisonRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入（覆盖）某 BOM 编码的当前比对结果
    ///
    /// 覆盖时 created_at 与 is_finalized 保留（定稿标记只由定稿置位、由重置清除）
    ///
    /// # 返回
    /// - Ok(is_finalized): 写入后该行的定稿标记
    pub fn upsert(
        &self,
        bom_code: &str,
        result: &ComparisonResult,
        original_image_ref: Option<&str>,
    ) -> RepositoryResult<bool> {
        let json = serde_json::to_string(result)?;
        let now = Utc::now();

        let conn = self.get_conn()?;
        let is_finalized = conn.query_row(
            r#"
            INSERT INTO detection_results (
                bom_code, original_image, annotated_image, comparison_result_json,
                original_image_ref, is_finalized, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)
            ON CONFLICT(bom_code) DO UPDATE SET
                original_image = excluded.original_image,
                annotated_image = excluded.annotated_image,
                comparison_result_json = excluded.comparison_result_json,
                original_image_ref = excluded.original_image_ref,
                updated_at = excluded.updated_at
            RETURNING is_finalized
            "#,
            params![
                bom_code,
                result.original_image,
                result.annotated_image,
                json,
                original_image_ref,
                now,
            ],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(is_finalized)
    }

    /// 查询某 BOM 编码的当前比对记录
    pub fn find_by_bom_code(&self, bom_code: &str) -> RepositoryResult<Option<ComparisonRecord>> {
        let conn = self.get_conn()?;
        let raw = conn
            .query_row(
                r#"
                SELECT comparison_result_json, is_finalized, original_image_ref, created_at, updated_at
                FROM detection_results
                WHERE bom_code = ?1
                "#,
                params![bom_code],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, bool>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, DateTime<Utc>>(3)?,
                        row.get::<_, DateTime<Utc>>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((json, is_finalized, original_image_ref, created_at, updated_at)) = raw else {
            return Ok(None);
        };

        let mut result: ComparisonResult = serde_json::from_str(&json)?;
        result.is_finalized = is_finalized;

        Ok(Some(ComparisonRecord {
            bom_code: bom_code.to_string(),
            result,
            original_image_ref,
            created_at,
            updated_at,
        }))
    }

    /// 查询某 BOM 编码的当前比对结果
    pub fn find_result(&self, bom_code: &str) -> RepositoryResult<Option<ComparisonResult>> {
        Ok(self.find_by_bom_code(bom_code)?.map(|record| record.result))
    }
}

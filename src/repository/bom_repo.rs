// ==========================================
// BOM 零件核对系统 - BOM 明细数据仓储
// ==========================================
// 表: boms
// 红线: Repository 不做业务校验,只做数据映射
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::bom::{BomEntry, BomEntryWithStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// BomRepository - BOM 明细仓储
// ==========================================
pub struct BomRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BomRepository {
    /// 创建新的 BomRepository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入单条 BOM 明细
    ///
    /// # 返回
    /// - Ok(id): 新记录主键
    pub fn insert(&self, entry: &BomEntry) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO boms (bom_code, part_reference, part_name, part_description, quantity)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                entry.bom_code,
                entry.part_reference,
                entry.part_name,
                entry.part_description,
                entry.quantity,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 批量插入 BOM 明细（单事务，任一失败全部回滚）
    pub fn batch_insert(&self, entries: &[BomEntry]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO boms (bom_code, part_reference, part_name, part_description, quantity)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )?;
            for entry in entries {
                stmt.execute(params![
                    entry.bom_code,
                    entry.part_reference,
                    entry.part_name,
                    entry.part_description,
                    entry.quantity,
                ])?;
                count += 1;
            }
        }

        tx.commit()?;
        Ok(count)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 查询某 BOM 编码的需求数量（零件名 → 数量）
    ///
    /// 同一编码下重复出现的零件名数量累加；编码不存在时返回空表
    pub fn find_required_quantities(&self, bom_code: &str) -> RepositoryResult<BTreeMap<String, i64>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT part_name, SUM(quantity)
            FROM boms
            WHERE bom_code = ?1
            GROUP BY part_name
            "#,
        )?;

        let rows = stmt.query_map(params![bom_code], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut required = BTreeMap::new();
        for row in rows {
            let (part_name, qty) = row?;
            required.insert(part_name, qty);
        }
        Ok(required)
    }

    /// 查询全部 BOM 明细（按 bom_code, part_name 排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<BomEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, bom_code, part_reference, part_name, part_description, quantity
            FROM boms
            ORDER BY bom_code, part_name, id
            "#,
        )?;

        let entries = stmt
            .query_map([], map_bom_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// 查询某 BOM 编码的全部明细
    pub fn find_by_bom_code(&self, bom_code: &str) -> RepositoryResult<Vec<BomEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, bom_code, part_reference, part_name, part_description, quantity
            FROM boms
            WHERE bom_code = ?1
            ORDER BY part_name, id
            "#,
        )?;

        let entries = stmt
            .query_map(params![bom_code], map_bom_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// 查询全部 BOM 明细及其检测/定稿状态
    ///
    /// - has_detection_result: detection_results 中存在该 bom_code
    /// - is_finalized: 比对结果的 is_finalized 标志
    pub fn list_with_status(&self) -> RepositoryResult<Vec<BomEntryWithStatus>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                b.id, b.bom_code, b.part_reference, b.part_name, b.part_description, b.quantity,
                CASE WHEN dr.bom_code IS NOT NULL THEN 1 ELSE 0 END AS has_detection_result,
                COALESCE(dr.is_finalized, 0) AS is_finalized
            FROM boms b
            LEFT JOIN detection_results dr ON b.bom_code = dr.bom_code
            ORDER BY b.bom_code, b.part_name, b.id
            "#,
        )?;

        let entries = stmt
            .query_map([], |row| {
                Ok(BomEntryWithStatus {
                    entry: map_bom_row(row)?,
                    has_detection_result: row.get(6)?,
                    is_finalized: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

fn map_bom_row(row: &Row<'_>) -> rusqlite::Result<BomEntry> {
    Ok(BomEntry {
        id: row.get(0)?,
        bom_code: row.get(1)?,
        part_reference: row.get(2)?,
        part_name: row.get(3)?,
        part_description: row.get(4)?,
        quantity: row.get(5)?,
    })
}

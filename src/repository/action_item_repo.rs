// ==========================================
// BOM 零件核对系统 - 差异处理项数据仓储
// ==========================================
// 表: actionable_items
// 写入: 批量插入只经由 FinalizationRepository（与定稿标志同事务）
// 本仓储只负责状态更新与查询
// ==========================================

mod queries;

#[cfg(test)]
mod tests;

use crate::domain::types::ActionItemStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ActionItemRepository - 差异处理项仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
pub struct ActionItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActionItemRepository {
    /// 创建新的差异处理项仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 更新状态，同时刷新 updated_at
    ///
    /// # 返回
    /// - Ok(0): 记录不存在
    /// - Ok(1): 更新成功
    pub fn update_status(&self, id: i64, status: ActionItemStatus) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE actionable_items SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), Utc::now(), id],
        )?;
        Ok(rows)
    }
}

use super::ActionItemRepository;
use crate::domain::action_item::ActionableItem;
use crate::domain::types::{ActionItemStatus, ItemType};
use crate::repository::error::RepositoryResult;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

const SELECT_COLUMNS: &str = r#"
    SELECT id, bom_code, part_name, item_type, quantity_diff, status, created_at, updated_at
    FROM actionable_items
"#;

impl ActionItemRepository {
    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ActionableItem>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let item = conn
            .query_row(&sql, params![id], map_action_item_row)
            .optional()?;
        Ok(item)
    }

    /// 查询全部差异项（状态升序，创建时间倒序）
    pub fn list_all(&self) -> RepositoryResult<Vec<ActionableItem>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY status ASC, created_at DESC, id DESC", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map([], map_action_item_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// 查询某 BOM 编码的差异项（按插入顺序）
    pub fn find_by_bom_code(&self, bom_code: &str) -> RepositoryResult<Vec<ActionableItem>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE bom_code = ?1 ORDER BY id ASC", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![bom_code], map_action_item_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// 统计某 BOM 编码的差异项数量
    pub fn count_by_bom_code(&self, bom_code: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM actionable_items WHERE bom_code = ?1",
            params![bom_code],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

/// 行映射（列顺序见 SELECT_COLUMNS）
pub(crate) fn map_action_item_row(row: &Row<'_>) -> rusqlite::Result<ActionableItem> {
    let item_type_raw: String = row.get(3)?;
    let item_type = ItemType::from_str(&item_type_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            format!("未知 item_type: {}", item_type_raw).into(),
        )
    })?;

    let status_raw: String = row.get(5)?;
    let status = ActionItemStatus::from_str(&status_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            Type::Text,
            format!("未知 status: {}", status_raw).into(),
        )
    })?;

    Ok(ActionableItem {
        id: row.get(0)?,
        bom_code: row.get(1)?,
        part_name: row.get(2)?,
        item_type,
        quantity_diff: row.get(4)?,
        status,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

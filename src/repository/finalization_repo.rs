// ==========================================
// BOM 零件核对系统 - 定稿/重置事务仓储
// ==========================================
// 职责: 跨 actionable_items / detection_results 的两个原子操作
// - finalize: 插入整批差异项 + 置位 is_finalized
// - reset:    删除差异项 + 删除比对结果
// 红线: 任一步失败整体回滚;业务校验由 API 层完成
// ==========================================

use crate::domain::action_item::{FinalizeOutcome, NewActionableItem, ResetOutcome};
use crate::domain::types::{ActionItemStatus, RefinalizePolicy};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::sync::{Arc, Mutex};

// ==========================================
// FinalizationRepository - 定稿/重置事务仓储
// ==========================================
pub struct FinalizationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FinalizationRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 定稿：单事务插入整批差异项并置位比对结果
    ///
    /// # 参数
    /// - `bom_code`: 批次共享的 BOM 编码（调用方已校验整批一致）
    /// - `items`: 差异项（状态固定为 BARU_MASUK）
    /// - `policy`: 未重置即再次定稿时的处理方式
    ///
    /// # 并发
    /// 使用 BEGIN IMMEDIATE 获取写锁，策略检查与写入处于同一临界区，
    /// 同一 bom_code 的并发定稿不会同时提交
    ///
    /// # 返回
    /// - Ok(FinalizeOutcome): comparison_flagged=false 表示无比对结果（仅告警）
    /// - Err(AlreadyFinalized): policy=Reject 且已定稿
    pub fn finalize(
        &self,
        bom_code: &str,
        items: &[NewActionableItem],
        policy: RefinalizePolicy,
    ) -> RepositoryResult<FinalizeOutcome> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if policy == RefinalizePolicy::Reject {
            let existing_items: i64 = tx.query_row(
                "SELECT COUNT(*) FROM actionable_items WHERE bom_code = ?1",
                params![bom_code],
                |row| row.get(0),
            )?;
            let flagged: Option<bool> = tx
                .query_row(
                    "SELECT is_finalized FROM detection_results WHERE bom_code = ?1",
                    params![bom_code],
                    |row| row.get(0),
                )
                .optional()?;

            if existing_items > 0 || flagged == Some(true) {
                return Err(RepositoryError::AlreadyFinalized {
                    bom_code: bom_code.to_string(),
                });
            }
        }

        let now = Utc::now();
        let mut inserted_count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO actionable_items (
                    bom_code, part_name, item_type, quantity_diff, status, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                "#,
            )?;
            for item in items {
                stmt.execute(params![
                    item.bom_code,
                    item.part_name,
                    item.item_type.as_str(),
                    item.quantity_diff,
                    ActionItemStatus::New.as_str(),
                    now,
                ])?;
                inserted_count += 1;
            }
        }

        let flagged_rows = tx.execute(
            "UPDATE detection_results SET is_finalized = 1, updated_at = ?2 WHERE bom_code = ?1",
            params![bom_code, now],
        )?;
        if flagged_rows == 0 {
            tracing::warn!(
                bom_code = %bom_code,
                "定稿时未找到比对结果，is_finalized 未置位（差异项已保存）"
            );
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(FinalizeOutcome {
            bom_code: bom_code.to_string(),
            inserted_count,
            comparison_flagged: flagged_rows > 0,
        })
    }

    /// 重置：单事务删除差异项与比对结果（BOM 明细不受影响）
    ///
    /// 无任何记录时同样成功
    pub fn reset(&self, bom_code: &str) -> RepositoryResult<ResetOutcome> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let deleted_items = tx.execute(
            "DELETE FROM actionable_items WHERE bom_code = ?1",
            params![bom_code],
        )?;
        let deleted_results = tx.execute(
            "DELETE FROM detection_results WHERE bom_code = ?1",
            params![bom_code],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(ResetOutcome {
            bom_code: bom_code.to_string(),
            deleted_items,
            deleted_results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::domain::comparison::ComparisonResult;
    use crate::domain::types::ItemType;
    use crate::repository::{ActionItemRepository, BomRepository, ComparisonRepository};
    use crate::domain::bom::BomEntry;

    struct Fixture {
        finalization: FinalizationRepository,
        comparisons: ComparisonRepository,
        items: ActionItemRepository,
        boms: BomRepository,
    }

    fn setup() -> Fixture {
        let conn = Arc::new(Mutex::new(open_in_memory().unwrap()));
        Fixture {
            finalization: FinalizationRepository::new(conn.clone()),
            comparisons: ComparisonRepository::new(conn.clone()),
            items: ActionItemRepository::new(conn.clone()),
            boms: BomRepository::from_connection(conn),
        }
    }

    fn batch(bom_code: &str) -> Vec<NewActionableItem> {
        vec![
            NewActionableItem::new(bom_code, "Screw-M3", ItemType::Shortage, 3),
            NewActionableItem::new(bom_code, "Washer-X", ItemType::Surplus, 3),
        ]
    }

    #[test]
    fn test_finalize_inserts_and_flags() {
        let fx = setup();
        fx.comparisons
            .upsert("BOM-1", &ComparisonResult::default(), None)
            .unwrap();

        let outcome = fx
            .finalization
            .finalize("BOM-1", &batch("BOM-1"), RefinalizePolicy::Reject)
            .unwrap();

        assert_eq!(outcome.inserted_count, 2);
        assert!(outcome.comparison_flagged);
        assert!(fx.comparisons.find_result("BOM-1").unwrap().unwrap().is_finalized);

        let items = fx.items.find_by_bom_code("BOM-1").unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.status == ActionItemStatus::New));
        assert!(items.iter().all(|i| i.created_at == i.updated_at));
    }

    #[test]
    fn test_finalize_without_comparison_is_not_fatal() {
        let fx = setup();
        let outcome = fx
            .finalization
            .finalize("BOM-9", &batch("BOM-9"), RefinalizePolicy::Reject)
            .unwrap();

        assert!(!outcome.comparison_flagged);
        assert_eq!(fx.items.count_by_bom_code("BOM-9").unwrap(), 2);
    }

    #[test]
    fn test_finalize_rolls_back_when_insert_fails_midway() {
        let fx = setup();
        fx.comparisons
            .upsert("BOM-1", &ComparisonResult::default(), None)
            .unwrap();

        let mut items = batch("BOM-1");
        items.insert(1, NewActionableItem::new("BOM-1", "Broken", ItemType::Shortage, 0));

        let err = fx
            .finalization
            .finalize("BOM-1", &items, RefinalizePolicy::Reject)
            .unwrap_err();

        assert!(matches!(err, RepositoryError::CheckConstraintViolation(_)));
        assert_eq!(fx.items.count_by_bom_code("BOM-1").unwrap(), 0);
        assert!(!fx.comparisons.find_result("BOM-1").unwrap().unwrap().is_finalized);
    }

    #[test]
    fn test_refinalize_rejected_or_appended_by_policy() {
        let fx = setup();
        fx.finalization
            .finalize("BOM-1", &batch("BOM-1"), RefinalizePolicy::Reject)
            .unwrap();

        let err = fx
            .finalization
            .finalize("BOM-1", &batch("BOM-1"), RefinalizePolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyFinalized { .. }));
        assert_eq!(fx.items.count_by_bom_code("BOM-1").unwrap(), 2);

        fx.finalization
            .finalize("BOM-1", &batch("BOM-1"), RefinalizePolicy::Append)
            .unwrap();
        assert_eq!(fx.items.count_by_bom_code("BOM-1").unwrap(), 4);
    }

    #[test]
    fn test_reset_clears_items_and_result_but_keeps_bom() {
        let fx = setup();
        fx.boms.insert(&BomEntry::new("BOM-1", "Screw-M3", 10)).unwrap();
        fx.comparisons
            .upsert("BOM-1", &ComparisonResult::default(), None)
            .unwrap();
        fx.finalization
            .finalize("BOM-1", &batch("BOM-1"), RefinalizePolicy::Reject)
            .unwrap();
        fx.finalization
            .finalize("BOM-2", &batch("BOM-2"), RefinalizePolicy::Reject)
            .unwrap();

        let outcome = fx.finalization.reset("BOM-1").unwrap();
        assert_eq!(outcome.deleted_items, 2);
        assert_eq!(outcome.deleted_results, 1);

        assert!(fx.comparisons.find_by_bom_code("BOM-1").unwrap().is_none());
        assert_eq!(fx.items.count_by_bom_code("BOM-1").unwrap(), 0);
        assert_eq!(fx.items.count_by_bom_code("BOM-2").unwrap(), 2);
        assert_eq!(fx.boms.find_by_bom_code("BOM-1").unwrap().len(), 1);

        // 重置后可重新定稿，生成全新批次
        fx.finalization
            .finalize("BOM-1", &batch("BOM-1"), RefinalizePolicy::Reject)
            .unwrap();
        assert_eq!(fx.items.count_by_bom_code("BOM-1").unwrap(), 2);
    }

    #[test]
    fn test_reset_of_unknown_code_succeeds() {
        let fx = setup();
        let outcome = fx.finalization.reset("NOPE").unwrap();
        assert_eq!(outcome, ResetOutcome {
            bom_code: "NOPE".to_string(),
            deleted_items: 0,
            deleted_results: 0,
        });
    }
}

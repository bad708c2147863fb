use super::*;
use crate::db::open_in_memory;

fn setup() -> ActionItemRepository {
    let conn = open_in_memory().unwrap();
    ActionItemRepository::new(Arc::new(Mutex::new(conn)))
}

fn seed(repo: &ActionItemRepository, bom_code: &str, part_name: &str, status: &str, created_at: &str) -> i64 {
    let conn = repo.get_conn().unwrap();
    conn.execute(
        r#"
        INSERT INTO actionable_items (bom_code, part_name, item_type, quantity_diff, status, created_at, updated_at)
        VALUES (?1, ?2, 'shortage', 2, ?3, ?4, ?4)
        "#,
        params![bom_code, part_name, status, created_at],
    )
    .unwrap();
    conn.last_insert_rowid()
}

#[test]
fn test_update_status_refreshes_updated_at() {
    let repo = setup();
    let id = seed(&repo, "BOM-1", "Screw-M3", "BARU_MASUK", "2024-01-01 08:00:00+00:00");

    let rows = repo.update_status(id, ActionItemStatus::InProgress).unwrap();
    assert_eq!(rows, 1);

    let item = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(item.status, ActionItemStatus::InProgress);
    assert!(item.updated_at > item.created_at);
    assert_eq!(item.quantity_diff, 2);
}

#[test]
fn test_update_status_of_missing_row_touches_nothing() {
    let repo = setup();
    assert_eq!(repo.update_status(404, ActionItemStatus::Done).unwrap(), 0);
    assert!(repo.find_by_id(404).unwrap().is_none());
}

#[test]
fn test_list_all_orders_by_status_then_newest_first() {
    let repo = setup();
    let old_new = seed(&repo, "BOM-1", "A", "BARU_MASUK", "2024-01-01 08:00:00+00:00");
    let done = seed(&repo, "BOM-1", "B", "SELESAI", "2024-01-03 08:00:00+00:00");
    let recent_new = seed(&repo, "BOM-2", "C", "BARU_MASUK", "2024-01-02 08:00:00+00:00");
    let in_progress = seed(&repo, "BOM-2", "D", "DITINDAKLANJUTI", "2024-01-01 09:00:00+00:00");

    let ids: Vec<i64> = repo.list_all().unwrap().into_iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![recent_new, old_new, in_progress, done]);
}

#[test]
fn test_find_and_count_by_bom_code() {
    let repo = setup();
    seed(&repo, "BOM-1", "A", "BARU_MASUK", "2024-01-01 08:00:00+00:00");
    seed(&repo, "BOM-1", "B", "BARU_MASUK", "2024-01-01 08:00:00+00:00");
    seed(&repo, "BOM-2", "C", "BARU_MASUK", "2024-01-01 08:00:00+00:00");

    let items = repo.find_by_bom_code("BOM-1").unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].part_name, "A");
    assert_eq!(items[1].part_name, "B");
    assert_eq!(repo.count_by_bom_code("BOM-2").unwrap(), 1);
    assert_eq!(repo.count_by_bom_code("BOM-3").unwrap(), 0);
}

#[test]
fn test_status_column_rejects_unknown_literal() {
    let repo = setup();
    let conn = repo.get_conn().unwrap();
    let result = conn.execute(
        r#"
        INSERT INTO actionable_items (bom_code, part_name, item_type, quantity_diff, status, created_at, updated_at)
        VALUES ('BOM-1', 'A', 'shortage', 1, 'DONE', '2024-01-01 08:00:00+00:00', '2024-01-01 08:00:00+00:00')
        "#,
        [],
    );
    assert!(result.is_err());
}

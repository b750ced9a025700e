use review_responder::{LedgerEntry, ReviewLedger};
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn test_mark_twice_leaves_one_row() {
    let temp_dir = TempDir::new().unwrap();
    let ledger = ReviewLedger::open(&temp_dir.path().join("state.sqlite3"))
        .await
        .unwrap();

    let entry = LedgerEntry::new("loc", "r1");
    assert_eq!(ledger.mark_responded(&[entry.clone()]).await.unwrap(), 1);
    assert_eq!(ledger.mark_responded(&[entry.clone()]).await.unwrap(), 0);
    // 同一批次內重複也不會出錯
    assert_ok!(ledger.mark_responded(&[entry.clone(), entry.clone()]).await);

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM responded_reviews WHERE location_id = 'loc' AND review_id = 'r1'",
    )
    .fetch_one(ledger.pool())
    .await
    .unwrap();
    assert_eq!(rows, 1);
    assert!(ledger.has_responded("loc", "r1").await.unwrap());

    ledger.close().await;
}

#[tokio::test]
async fn test_entries_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.sqlite3");

    let ledger = ReviewLedger::open(&path).await.unwrap();
    ledger
        .mark_responded(&[LedgerEntry::new("north", "a"), LedgerEntry::new("south", "a")])
        .await
        .unwrap();
    ledger.close().await;

    // 重新開啟時 schema 建立為冪等
    let reopened = ReviewLedger::open(&path).await.unwrap();
    assert_eq!(reopened.len().await.unwrap(), 2);
    assert!(reopened.has_responded("north", "a").await.unwrap());
    assert!(reopened.has_responded("south", "a").await.unwrap());
    assert!(!reopened.has_responded("north", "b").await.unwrap());
    reopened.close().await;
}

#[tokio::test]
async fn test_composite_primary_key_is_enforced() {
    let temp_dir = TempDir::new().unwrap();
    let ledger = ReviewLedger::open(&temp_dir.path().join("state.sqlite3"))
        .await
        .unwrap();

    ledger
        .mark_responded(&[LedgerEntry::new("loc", "r1")])
        .await
        .unwrap();

    let duplicate = sqlx::query(
        "INSERT INTO responded_reviews (location_id, review_id) VALUES ('loc', 'r1')",
    )
    .execute(ledger.pool())
    .await;
    assert_err!(duplicate);

    ledger.close().await;
}

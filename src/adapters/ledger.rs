use crate::domain::model::LedgerEntry;
use crate::utils::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::path::Path;

const CREATE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS responded_reviews (
    location_id TEXT NOT NULL,
    review_id TEXT NOT NULL,
    PRIMARY KEY (location_id, review_id)
)";

/// Durable set of (location, review) pairs that already received a reply.
///
/// Backed by a single SQLite table. Assumes one responder process per ledger
/// file; the pool holds a single connection.
pub struct ReviewLedger {
    pool: SqlitePool,
}

impl ReviewLedger {
    /// 開啟（必要時建立）ledger 檔案並確保資料表存在
    pub async fn open(path: &Path) -> Result<Self> {
        tracing::info!("Opening review ledger at: {}", path.display());

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let ledger = Self { pool };
        ledger.ensure_schema().await?;
        Ok(ledger)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn has_responded(&self, location_id: &str, review_id: &str) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM responded_reviews WHERE location_id = ? AND review_id = ?",
        )
        .bind(location_id)
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// Inserts every entry not yet present, in one transaction. Duplicates are
    /// ignored. Returns the number of rows actually added.
    pub async fn mark_responded(&self, entries: &[LedgerEntry]) -> Result<u64> {
        if entries.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for entry in entries {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO responded_reviews (location_id, review_id) VALUES (?, ?)",
            )
            .bind(entry.location_id.as_str())
            .bind(entry.review_id.as_str())
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;

        tracing::debug!(
            "Recorded {} new ledger entries ({} already present)",
            inserted,
            entries.len() as u64 - inserted
        );
        Ok(inserted)
    }

    pub async fn len(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM responded_reviews")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 關閉連線池，所有寫入在此之前都已提交
    pub async fn close(self) {
        self.pool.close().await;
        tracing::debug!("Review ledger closed");
    }
}

// src/store.rs
//! Persistent record of postings already notified, keyed by posting id.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use metrics::counter;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::ingest::types::JobPosting;

/// One row of `seen_jobs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRecord {
    pub id: String,
    pub source: String,
    pub title: String,
    pub company: String,
    pub created_at: String,
}

impl From<&JobPosting> for SeenRecord {
    fn from(p: &JobPosting) -> Self {
        Self {
            id: p.id.clone(),
            source: p.source.as_str().to_string(),
            title: p.title.clone(),
            company: p.company.clone(),
            created_at: p.created_at.clone(),
        }
    }
}

pub struct SeenStore {
    pool: SqlitePool,
}

impl SeenStore {
    /// Opens (creating if needed) the store file and its parent directory.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating seen store dir {}", dir.display()))?;
        }
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await
            .with_context(|| format!("opening seen store {}", path.display()))?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Ephemeral store for tests. A single connection keeps one database alive.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("opening in-memory seen store")?;
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS seen_jobs (
                id TEXT PRIMARY KEY,
                source TEXT,
                title TEXT,
                company TEXT,
                created_at TEXT,
                first_seen_at TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("creating seen_jobs table")?;
        Ok(())
    }

    pub async fn has(&self, id: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM seen_jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("looking up seen id {id}"))?;
        Ok(row.is_some())
    }

    /// Inserts the record unless its id is already present. Returns whether a
    /// row was written.
    pub async fn put(&self, rec: &SeenRecord) -> Result<bool> {
        let first_seen = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let res = sqlx::query(
            "INSERT OR IGNORE INTO seen_jobs \
             (id, source, title, company, created_at, first_seen_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&rec.id)
        .bind(&rec.source)
        .bind(&rec.title)
        .bind(&rec.company)
        .bind(&rec.created_at)
        .bind(first_seen)
        .execute(&self.pool)
        .await
        .with_context(|| format!("recording seen id {}", rec.id))?;

        let inserted = res.rows_affected() > 0;
        if inserted {
            counter!("seen_inserted_total").increment(1);
        }
        Ok(inserted)
    }

    pub async fn len(&self) -> Result<u64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seen_jobs")
            .fetch_one(&self.pool)
            .await
            .context("counting seen_jobs")?;
        Ok(n.max(0) as u64)
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Deletes rows first seen more than `days` before `now`.
    pub async fn prune_older_than(&self, days: u32, now: DateTime<Utc>) -> Result<u64> {
        let cutoff = (now - Duration::days(i64::from(days)))
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let res = sqlx::query("DELETE FROM seen_jobs WHERE first_seen_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .context("pruning seen_jobs")?;
        Ok(res.rows_affected())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str) -> SeenRecord {
        SeenRecord {
            id: id.to_string(),
            source: "remoteok".into(),
            title: "Backend Engineer".into(),
            company: "Acme".into(),
            created_at: "2025-06-10T11:30:00Z".into(),
        }
    }

    #[tokio::test]
    async fn put_is_idempotent() {
        let s = SeenStore::in_memory().await.unwrap();
        assert!(!s.has("remoteok_1").await.unwrap());
        assert!(s.put(&rec("remoteok_1")).await.unwrap());
        assert!(!s.put(&rec("remoteok_1")).await.unwrap());
        assert!(s.has("remoteok_1").await.unwrap());
        assert_eq!(s.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn prune_keeps_recent_rows() {
        let s = SeenStore::in_memory().await.unwrap();
        s.put(&rec("a")).await.unwrap();
        let removed = s.prune_older_than(30, Utc::now()).await.unwrap();
        assert_eq!(removed, 0);
        let removed = s
            .prune_older_than(30, Utc::now() + Duration::days(31))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(s.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn closed_store_errors() {
        let s = SeenStore::in_memory().await.unwrap();
        s.close().await;
        assert!(s.has("x").await.is_err());
        assert!(s.put(&rec("x")).await.is_err());
    }
}

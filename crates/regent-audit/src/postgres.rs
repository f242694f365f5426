//! # PostgreSQL Audit Store
//!
//! Durable backend: one row per analysis, the full entry as JSONB, with
//! the content hash as primary key so idempotency is enforced by the
//! database itself (`INSERT ... ON CONFLICT DO NOTHING`).

use std::future::Future;

use sqlx::postgres::{PgPool, PgPoolOptions};

use regent_core::ContentDigest;

use crate::entry::AuditEntry;
use crate::store::{AppendOutcome, AuditError, AuditStore};

/// Audit store backed by a PostgreSQL `audit_entries` table.
#[derive(Debug, Clone)]
pub struct PostgresAuditStore {
    pool: PgPool,
}

impl PostgresAuditStore {
    /// Wrap an existing connection pool. Call [`Self::migrate`] before
    /// first use.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `url` and apply migrations.
    pub async fn connect(url: &str) -> Result<Self, AuditError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(url)
            .await?;
        tracing::info!("connected to PostgreSQL audit store");
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Apply embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), AuditError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AuditError::Persistence {
                reason: format!("migration failed: {e}"),
            })?;
        tracing::info!("audit store migrations applied");
        Ok(())
    }

    async fn insert(&self, entry: AuditEntry) -> Result<AppendOutcome, AuditError> {
        let key = entry.content_hash.to_hex();
        let body = serde_json::to_value(&entry).map_err(|e| AuditError::Persistence {
            reason: format!("failed to serialize audit entry: {e}"),
        })?;

        let result = sqlx::query(
            "INSERT INTO audit_entries (content_hash, entry, recorded_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (content_hash) DO NOTHING",
        )
        .bind(&key)
        .bind(&body)
        .bind(entry.recorded_at.as_datetime())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            Ok(AppendOutcome::Recorded)
        } else {
            tracing::debug!(content_hash = %key, "audit entry already recorded");
            Ok(AppendOutcome::AlreadyRecorded)
        }
    }

    async fn fetch(&self, content_hash: &ContentDigest) -> Result<Option<AuditEntry>, AuditError> {
        let key = content_hash.to_hex();
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT entry FROM audit_entries WHERE content_hash = $1")
                .bind(&key)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            None => Ok(None),
            Some((value,)) => {
                let entry = serde_json::from_value(value).map_err(|e| AuditError::Corrupted {
                    content_hash: key,
                    reason: e.to_string(),
                })?;
                Ok(Some(entry))
            }
        }
    }
}

impl AuditStore for PostgresAuditStore {
    fn append(
        &self,
        entry: AuditEntry,
    ) -> impl Future<Output = Result<AppendOutcome, AuditError>> + Send {
        self.insert(entry)
    }

    fn get(
        &self,
        content_hash: &ContentDigest,
    ) -> impl Future<Output = Result<Option<AuditEntry>, AuditError>> + Send {
        self.fetch(content_hash)
    }
}

//! # Audit Store Trait — Append and Lookup
//!
//! The trait surface is deliberately minimal: `append` and `get`, both
//! keyed by content hash. Idempotency is a store obligation, not a
//! caller courtesy — `append` with an already-recorded key must leave
//! the existing entry untouched and report [`AppendOutcome::AlreadyRecorded`].

use std::future::Future;

use thiserror::Error;

use regent_core::ContentDigest;

use crate::entry::AuditEntry;

/// Result of an append: whether this call created the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The entry was written by this call.
    Recorded,
    /// An entry with this content hash already existed; nothing changed.
    AlreadyRecorded,
}

/// Errors from audit persistence.
#[derive(Error, Debug)]
pub enum AuditError {
    /// The backend rejected or failed the operation.
    #[error("audit persistence failed: {reason}")]
    Persistence { reason: String },

    /// A stored entry could not be decoded back into an [`AuditEntry`].
    #[error("audit entry for {content_hash} is corrupted: {reason}")]
    Corrupted {
        content_hash: String,
        reason: String,
    },
}

impl From<sqlx::Error> for AuditError {
    fn from(err: sqlx::Error) -> Self {
        AuditError::Persistence {
            reason: err.to_string(),
        }
    }
}

/// Append-only record store for completed analyses.
pub trait AuditStore: Send + Sync {
    /// Record an entry under its content hash. Idempotent: appending a
    /// key that already exists is a no-op reported as `AlreadyRecorded`.
    fn append(
        &self,
        entry: AuditEntry,
    ) -> impl Future<Output = Result<AppendOutcome, AuditError>> + Send;

    /// Fetch the entry recorded under `content_hash`, if any.
    fn get(
        &self,
        content_hash: &ContentDigest,
    ) -> impl Future<Output = Result<Option<AuditEntry>, AuditError>> + Send;
}

impl<T: AuditStore> AuditStore for std::sync::Arc<T> {
    fn append(
        &self,
        entry: AuditEntry,
    ) -> impl Future<Output = Result<AppendOutcome, AuditError>> + Send {
        T::append(self, entry)
    }

    fn get(
        &self,
        content_hash: &ContentDigest,
    ) -> impl Future<Output = Result<Option<AuditEntry>, AuditError>> + Send {
        T::get(self, content_hash)
    }
}

//! In-memory audit store for development and tests, plus a
//! deliberately failing store for exercising audit-failure paths.

use std::collections::BTreeMap;
use std::future::{ready, Future};

use parking_lot::RwLock;

use regent_core::ContentDigest;

use crate::entry::AuditEntry;
use crate::store::{AppendOutcome, AuditError, AuditStore};

/// Process-local append-only store keyed by content hash hex.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    entries: RwLock<BTreeMap<String, AuditEntry>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl AuditStore for InMemoryAuditStore {
    fn append(
        &self,
        entry: AuditEntry,
    ) -> impl Future<Output = Result<AppendOutcome, AuditError>> + Send {
        let key = entry.content_hash.to_hex();
        let mut entries = self.entries.write();
        let outcome = if entries.contains_key(&key) {
            // First record wins; identical re-runs change nothing.
            AppendOutcome::AlreadyRecorded
        } else {
            entries.insert(key, entry);
            AppendOutcome::Recorded
        };
        ready(Ok(outcome))
    }

    fn get(
        &self,
        content_hash: &ContentDigest,
    ) -> impl Future<Output = Result<Option<AuditEntry>, AuditError>> + Send {
        let found = self.entries.read().get(&content_hash.to_hex()).cloned();
        ready(Ok(found))
    }
}

/// A store whose every operation fails. Used to test that audit
/// persistence failure is surfaced without discarding the report.
#[derive(Debug, Default)]
pub struct FailingAuditStore;

impl AuditStore for FailingAuditStore {
    fn append(
        &self,
        _entry: AuditEntry,
    ) -> impl Future<Output = Result<AppendOutcome, AuditError>> + Send {
        ready(Err(AuditError::Persistence {
            reason: "audit backend offline".into(),
        }))
    }

    fn get(
        &self,
        _content_hash: &ContentDigest,
    ) -> impl Future<Output = Result<Option<AuditEntry>, AuditError>> + Send {
        ready(Err(AuditError::Persistence {
            reason: "audit backend offline".into(),
        }))
    }
}

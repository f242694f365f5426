//! # regent-audit — Append-Only Analysis Records
//!
//! Every completed analysis is recorded as an [`AuditEntry`] keyed by
//! the report's content hash. Because the hash excludes timestamps,
//! re-running an identical analysis maps to the same key and appending
//! is idempotent: the first record wins and later identical runs leave
//! the log untouched.
//!
//! ## Backends
//!
//! - [`InMemoryAuditStore`] — process-local, for development and tests.
//! - [`PostgresAuditStore`] — durable JSONB storage behind a primary
//!   key on the content hash.
//!
//! ## Invariant
//!
//! The store is append-only: no update or delete operation exists on
//! the trait. Audit failure never corrupts partial state — an entry is
//! either fully present or absent.

pub mod entry;
pub mod memory;
pub mod postgres;
pub mod store;

pub use entry::AuditEntry;
pub use memory::{FailingAuditStore, InMemoryAuditStore};
pub use postgres::PostgresAuditStore;
pub use store::{AppendOutcome, AuditError, AuditStore};

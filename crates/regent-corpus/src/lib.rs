//! # regent-corpus — Corpus Store Boundary
//!
//! The corpus of regulation texts and enforcement cases is owned by the
//! ingestion pipeline and consumed here strictly read-only, through the
//! narrow [`CorpusStore`] similarity-query trait. The engine never holds
//! corpus state of its own, so concurrent analyses share nothing but
//! this external service.
//!
//! Two implementations ship with the crate:
//!
//! - [`HttpCorpusStore`] — reqwest client for the corpus search service.
//! - [`InMemoryCorpusStore`] — deterministic fixture store for tests.
//!
//! Unreachability is a hard error ([`CorpusError::Unreachable`]), never a
//! silent degradation: reasoning without evidence is unsafe, so the
//! engine surfaces it as `RetrievalUnavailable`.

pub mod http;
pub mod memory;
pub mod passage;
pub mod store;

pub use http::{CorpusConfig, HttpCorpusStore};
pub use memory::{InMemoryCorpusStore, UnavailableCorpusStore};
pub use passage::{EvidencePassage, PassageId, Provenance, RelevanceBps, SourceKind};
pub use store::{CorpusError, CorpusStore};

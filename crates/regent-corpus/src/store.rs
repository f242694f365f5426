//! # Corpus Store Trait — The Read-Only Similarity Interface
//!
//! The engine consumes the corpus through exactly one operation:
//! `query(text, family, k)` returning relevance-ordered passages. The
//! trait is implemented by the HTTP client for production and by the
//! in-memory store for tests; the engine is generic over it and never
//! sees transport details.

use std::future::Future;

use regent_core::RegulationFamily;
use thiserror::Error;

use crate::passage::EvidencePassage;

/// Errors from corpus queries.
///
/// `Unreachable` is fatal to the analysis (surfaced as
/// `RetrievalUnavailable`); there is no degraded retrieval mode.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// The corpus service could not be reached or answered 5xx.
    #[error("corpus store unreachable: {reason}")]
    Unreachable {
        /// Diagnostic detail (endpoint, transport error, status).
        reason: String,
    },

    /// The corpus service answered, but the response did not match the
    /// expected shape.
    #[error("malformed corpus response from {endpoint}: {reason}")]
    MalformedResponse {
        /// The endpoint that produced the response.
        endpoint: String,
        /// Diagnostic detail.
        reason: String,
    },
}

/// Read-only similarity queries against the regulation/case corpus.
///
/// Implementations must be `Send + Sync`; the engine shares one store
/// across concurrent per-family queries behind an `Arc`. Identical
/// inputs must return identical results within the corpus's freshness
/// window — audit reproducibility depends on it.
pub trait CorpusStore: Send + Sync {
    /// Return the top-`k` passages for `text` within `family`, ordered
    /// by descending relevance.
    ///
    /// A family with no matches yields `Ok(vec![])`, never an error:
    /// absence of evidence is a finding, not a failure.
    fn query(
        &self,
        text: &str,
        family: RegulationFamily,
        k: usize,
    ) -> impl Future<Output = Result<Vec<EvidencePassage>, CorpusError>> + Send;
}

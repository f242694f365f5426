//! # In-Memory Corpus Stores
//!
//! Deterministic fixture implementations of [`CorpusStore`] used by unit
//! and integration tests. `InMemoryCorpusStore` serves a fixed passage
//! set; `UnavailableCorpusStore` fails every query, modeling a corpus
//! outage.

use regent_core::RegulationFamily;

use crate::passage::EvidencePassage;
use crate::store::{CorpusError, CorpusStore};

/// A corpus store backed by a fixed in-memory passage set.
///
/// Queries filter by family, order by descending relevance with passage
/// id as the tie-break (the same ordering contract the production
/// service provides), and truncate to `k`. The query text is ignored —
/// fixtures decide relevance up front.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpusStore {
    passages: Vec<EvidencePassage>,
}

impl InMemoryCorpusStore {
    /// Create a store serving the given passages.
    pub fn with_passages(passages: Vec<EvidencePassage>) -> Self {
        Self { passages }
    }
}

impl CorpusStore for InMemoryCorpusStore {
    fn query(
        &self,
        _text: &str,
        family: RegulationFamily,
        k: usize,
    ) -> impl std::future::Future<Output = Result<Vec<EvidencePassage>, CorpusError>> + Send {
        let mut hits: Vec<EvidencePassage> = self
            .passages
            .iter()
            .filter(|p| p.family == family)
            .cloned()
            .collect();
        hits.sort_by(|a, b| {
            b.relevance
                .cmp(&a.relevance)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(k);
        std::future::ready(Ok(hits))
    }
}

/// A corpus store that is always down. Used to exercise the
/// `RetrievalUnavailable` path.
#[derive(Debug, Clone, Default)]
pub struct UnavailableCorpusStore;

impl CorpusStore for UnavailableCorpusStore {
    fn query(
        &self,
        _text: &str,
        family: RegulationFamily,
        _k: usize,
    ) -> impl std::future::Future<Output = Result<Vec<EvidencePassage>, CorpusError>> + Send {
        std::future::ready(Err(CorpusError::Unreachable {
            reason: format!("corpus store offline (query for {family})"),
        }))
    }
}

//! # Retriever — Concurrent Per-Family Corpus Fan-Out
//!
//! Issues one similarity query per requested regulation family,
//! concurrently, and joins before anything downstream runs. Queries are
//! independent reads, so the fan-out uses a `JoinSet`; dropping the
//! retrieval future aborts in-flight queries, which is what gives the
//! engine prompt cancellation.
//!
//! Cross-family deduplication: the same document slice retrieved under
//! two families keeps only the higher-scored copy. Corpus
//! unreachability aborts the whole retrieval — analysis without
//! evidence is unsafe, so there is no partial-result mode.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;

use regent_core::{ProjectProfile, RegulationFamily};
use regent_corpus::{CorpusError, CorpusStore, EvidencePassage, PassageId};

/// Retrieval failure: the corpus store could not serve the analysis.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// The corpus store was unreachable or a query task failed.
    #[error("corpus store unavailable: {reason}")]
    Unavailable {
        /// Diagnostic detail.
        reason: String,
    },
}

impl From<CorpusError> for RetrievalError {
    fn from(err: CorpusError) -> Self {
        Self::Unavailable {
            reason: err.to_string(),
        }
    }
}

/// Deduplicated evidence keyed by requested family.
///
/// Every requested family is present as a key; a family with no matches
/// maps to an empty slice. Per-family passages are ordered by descending
/// relevance with passage id as the tie-break.
#[derive(Debug, Clone, Default)]
pub struct EvidenceSet {
    by_family: BTreeMap<RegulationFamily, Vec<EvidencePassage>>,
}

impl EvidenceSet {
    /// Build from per-family passage lists. Exposed for assembler tests;
    /// production code goes through [`retrieve_evidence`].
    pub fn from_parts(by_family: BTreeMap<RegulationFamily, Vec<EvidencePassage>>) -> Self {
        let mut set = Self { by_family };
        for passages in set.by_family.values_mut() {
            passages.sort_by(|a, b| {
                b.relevance
                    .cmp(&a.relevance)
                    .then_with(|| a.id.cmp(&b.id))
            });
        }
        set
    }

    /// The requested families, in canonical order.
    pub fn families(&self) -> impl Iterator<Item = RegulationFamily> + '_ {
        self.by_family.keys().copied()
    }

    /// Passages retrieved for one family (empty if none matched).
    pub fn passages(&self, family: RegulationFamily) -> &[EvidencePassage] {
        self.by_family
            .get(&family)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total passage count across all families.
    pub fn len(&self) -> usize {
        self.by_family.values().map(Vec::len).sum()
    }

    /// True if no family has any evidence.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the similarity query text from the profile: the free-text
/// description, sharpened with whatever structured attributes are set.
fn query_text(profile: &ProjectProfile) -> String {
    let mut text = profile.description().to_string();
    let attrs = profile.attributes();
    if let Some(jurisdiction) = &attrs.jurisdiction {
        text.push_str(&format!("\nJurisdiction: {jurisdiction}"));
    }
    if let Some(token_model) = &attrs.token_model {
        text.push_str(&format!("\nToken model: {token_model}"));
    }
    if let Some(custody_model) = &attrs.custody_model {
        text.push_str(&format!("\nCustody model: {custody_model}"));
    }
    text
}

/// Retrieve top-`k` evidence per requested family, concurrently, and
/// deduplicate across families.
///
/// # Errors
///
/// [`RetrievalError::Unavailable`] if any query fails — the corpus
/// being down for one family is the corpus being down.
pub async fn retrieve_evidence<C>(
    store: &Arc<C>,
    profile: &ProjectProfile,
    k: usize,
) -> Result<EvidenceSet, RetrievalError>
where
    C: CorpusStore + 'static,
{
    let text = query_text(profile);
    let mut tasks: JoinSet<Result<(RegulationFamily, Vec<EvidencePassage>), CorpusError>> =
        JoinSet::new();

    for family in profile.families().iter().copied() {
        let store = Arc::clone(store);
        let text = text.clone();
        tasks.spawn(async move {
            let passages = store.query(&text, family, k).await?;
            Ok((family, passages))
        });
    }

    // Join point: context assembly must not start until every family
    // has answered. A failure aborts the remaining queries via JoinSet
    // drop.
    let mut raw: BTreeMap<RegulationFamily, Vec<EvidencePassage>> = profile
        .families()
        .iter()
        .map(|f| (*f, Vec::new()))
        .collect();

    while let Some(joined) = tasks.join_next().await {
        let (family, passages) = joined
            .map_err(|e| RetrievalError::Unavailable {
                reason: format!("retrieval task failed: {e}"),
            })??;
        tracing::debug!(family = %family, hits = passages.len(), "family retrieval complete");
        raw.insert(family, passages);
    }

    Ok(dedup_across_families(raw))
}

/// Keep only the highest-scored copy of a passage retrieved under more
/// than one family (identity = provenance-derived passage id). Ties go
/// to the earlier family in canonical order, deterministically.
fn dedup_across_families(
    raw: BTreeMap<RegulationFamily, Vec<EvidencePassage>>,
) -> EvidenceSet {
    let mut best: HashMap<PassageId, (RegulationFamily, EvidencePassage)> = HashMap::new();
    for (family, passages) in &raw {
        for passage in passages {
            match best.get(&passage.id) {
                Some((_, kept)) if kept.relevance >= passage.relevance => {}
                _ => {
                    best.insert(passage.id.clone(), (*family, passage.clone()));
                }
            }
        }
    }

    let mut by_family: BTreeMap<RegulationFamily, Vec<EvidencePassage>> =
        raw.keys().map(|f| (*f, Vec::new())).collect();
    for (_, (family, passage)) in best {
        if let Some(bucket) = by_family.get_mut(&family) {
            bucket.push(passage);
        }
    }

    EvidenceSet::from_parts(by_family)
}

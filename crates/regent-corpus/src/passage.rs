//! # Evidence Passages — Retrieved Corpus Excerpts
//!
//! An `EvidencePassage` is one retrieved excerpt from a regulation text
//! or an enforcement case, with its relevance score and provenance. It
//! is produced by the Retriever and read-only downstream; every
//! compliance gap must cite at least one passage id from the context it
//! was generated against.
//!
//! Relevance is carried as basis points (0–10000) rather than a float so
//! that passages can flow into canonical audit hashes unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

use regent_core::RegulationFamily;

/// What kind of corpus document a passage came from.
///
/// Regulation articles and enforcement precedents are kept distinct in
/// the serialized reasoning context; the distinction also survives into
/// audit entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// An article or recital of a regulation text.
    Regulation,
    /// A historical enforcement action or court decision.
    EnforcementCase,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regulation => f.write_str("regulation"),
            Self::EnforcementCase => f.write_str("enforcement_case"),
        }
    }
}

/// Provenance pointer: source document id plus character offset.
///
/// Provenance is passage identity — two retrievals of the same document
/// slice across different family queries dedup on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Provenance {
    /// Ingestion-assigned document identifier.
    pub document_id: String,
    /// Character offset of the excerpt within the document.
    pub offset: u64,
}

impl Provenance {
    /// Derive the passage id (`<document_id>@<offset>`) for this slice.
    pub fn passage_id(&self) -> PassageId {
        PassageId(format!("{}@{}", self.document_id, self.offset))
    }
}

/// Identifier of an evidence passage, derived from its provenance.
///
/// This is the citation currency of the system: gaps reference passages
/// by `PassageId`, and contract validation checks those references
/// against the assembled context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PassageId(String);

impl PassageId {
    /// Wrap an externally supplied id (e.g. a citation from the
    /// reasoning service, checked against the context afterwards).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PassageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Relevance score in basis points: 0 = irrelevant, 10000 = exact match.
///
/// Constructed from the store's float score via [`RelevanceBps::from_score`],
/// which clamps to [0, 1] first. Integer representation keeps floats out
/// of canonical serialization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct RelevanceBps(u16);

impl RelevanceBps {
    /// Convert a similarity score in [0, 1] to basis points, clamping
    /// out-of-range and NaN inputs to the nearest bound.
    pub fn from_score(score: f64) -> Self {
        if score.is_nan() {
            return Self(0);
        }
        let clamped = score.clamp(0.0, 1.0);
        Self((clamped * 10_000.0).round() as u16)
    }

    /// Raw basis points.
    pub fn as_bps(self) -> u16 {
        self.0
    }

    /// Back to a unit-interval float for display only.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10_000.0
    }
}

/// One retrieved excerpt with its score and provenance. Immutable after
/// retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidencePassage {
    /// Passage id derived from provenance.
    pub id: PassageId,
    /// Human-readable source identifier, e.g. "GDPR Art. 17".
    pub source: String,
    /// Regulation text vs enforcement precedent.
    pub kind: SourceKind,
    /// The regulation family the retrieval query was issued under.
    pub family: RegulationFamily,
    /// The text excerpt itself.
    pub excerpt: String,
    /// Relevance in basis points.
    pub relevance: RelevanceBps,
    /// Source document pointer.
    pub provenance: Provenance,
}

impl EvidencePassage {
    /// Budget cost of this passage in context assembly (excerpt bytes).
    pub fn size_bytes(&self) -> usize {
        self.excerpt.len()
    }
}

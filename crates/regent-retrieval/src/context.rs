//! # Context Assembler — Bounded, Deterministic Evidence Selection
//!
//! Selects an ordered subset of retrieved passages into the reasoning
//! context under a byte budget. The algorithm is greedy round-robin:
//! families are visited in canonical order, each contributing its next
//! best passage per round, so no family is starved before every family
//! with evidence has at least one slot.
//!
//! Determinism is a hard requirement: identical evidence sets and budget
//! must produce the identical context ordering, because the context is
//! part of the audit hash input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use regent_core::RegulationFamily;
use regent_corpus::{EvidencePassage, PassageId};

use crate::retriever::EvidenceSet;

/// Why a family does or does not appear in the assembled context.
///
/// `NoEvidenceFound` (the corpus had nothing) and `OmittedByBudget`
/// (evidence existed but the budget excluded it) are deliberately
/// distinct: the first is a substantive finding for the reasoning step,
/// the second is an engine limitation the caller should see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyCoverage {
    /// At least one passage for this family is in the context.
    Covered,
    /// The corpus returned no evidence for this family.
    NoEvidenceFound,
    /// Evidence existed but none of it fit the size budget.
    OmittedByBudget,
}

/// The ordered evidence selection for one analysis.
///
/// Total excerpt size respects the budget (with the single exception
/// that the first admitted passage may exceed it — the context is never
/// silently empty while evidence exists). Construction is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningContext {
    passages: Vec<EvidencePassage>,
    coverage: BTreeMap<RegulationFamily, FamilyCoverage>,
    budget_bytes: usize,
}

impl ReasoningContext {
    /// The selected passages, in assembly order.
    pub fn passages(&self) -> &[EvidencePassage] {
        &self.passages
    }

    /// Per-family coverage markers for every requested family.
    pub fn coverage(&self) -> &BTreeMap<RegulationFamily, FamilyCoverage> {
        &self.coverage
    }

    /// The byte budget the context was assembled under.
    pub fn budget_bytes(&self) -> usize {
        self.budget_bytes
    }

    /// True if a passage with this id is part of the context. Contract
    /// validation uses this to reject orphan citations.
    pub fn contains(&self, id: &PassageId) -> bool {
        self.passages.iter().any(|p| &p.id == id)
    }

    /// Total excerpt bytes admitted.
    pub fn size_bytes(&self) -> usize {
        self.passages.iter().map(EvidencePassage::size_bytes).sum()
    }
}

/// Assemble a reasoning context from deduplicated evidence under a byte
/// budget.
///
/// Round-robin over families in canonical order; within a family,
/// candidates are consumed in relevance order. A family whose next
/// candidate does not fit is retired for the rest of the assembly
/// (candidates are relevance-sorted, so skipping ahead to a smaller,
/// less relevant passage would trade evidence quality for fill).
pub fn assemble_context(evidence: &EvidenceSet, budget_bytes: usize) -> ReasoningContext {
    let families: Vec<RegulationFamily> = evidence.families().collect();

    // Per-family candidate cursors.
    let mut cursors: BTreeMap<RegulationFamily, usize> =
        families.iter().map(|f| (*f, 0)).collect();
    let mut retired: BTreeMap<RegulationFamily, bool> =
        families.iter().map(|f| (*f, false)).collect();

    let mut selected: Vec<EvidencePassage> = Vec::new();
    let mut used_bytes = 0usize;

    loop {
        let mut admitted_this_round = false;
        for family in &families {
            if retired[family] {
                continue;
            }
            let cursor = cursors[family];
            let candidates = evidence.passages(*family);
            let Some(candidate) = candidates.get(cursor) else {
                retired.insert(*family, true);
                continue;
            };

            let size = candidate.size_bytes();
            // The first admission ignores the budget so the context is
            // never empty while evidence exists.
            if selected.is_empty() || used_bytes + size <= budget_bytes {
                used_bytes += size;
                selected.push(candidate.clone());
                cursors.insert(*family, cursor + 1);
                admitted_this_round = true;
            } else {
                retired.insert(*family, true);
            }
        }
        if !admitted_this_round {
            break;
        }
    }

    let coverage = families
        .iter()
        .map(|family| {
            let marker = if selected.iter().any(|p| p.family == *family) {
                FamilyCoverage::Covered
            } else if evidence.passages(*family).is_empty() {
                FamilyCoverage::NoEvidenceFound
            } else {
                FamilyCoverage::OmittedByBudget
            };
            (*family, marker)
        })
        .collect();

    tracing::debug!(
        passages = selected.len(),
        used_bytes,
        budget_bytes,
        "context assembled"
    );

    ReasoningContext {
        passages: selected,
        coverage,
        budget_bytes,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use regent_corpus::{Provenance, RelevanceBps, SourceKind};

    fn arb_passage(family: RegulationFamily) -> impl Strategy<Value = EvidencePassage> {
        ("[a-z]{1,8}", 0u64..500, 0u16..=10_000, 1usize..120).prop_map(
            move |(doc, offset, bps, len)| {
                let provenance = Provenance {
                    document_id: doc,
                    offset,
                };
                EvidencePassage {
                    id: provenance.passage_id(),
                    source: "SRC".into(),
                    kind: SourceKind::Regulation,
                    family,
                    excerpt: "x".repeat(len),
                    relevance: RelevanceBps::from_score(f64::from(bps) / 10_000.0),
                    provenance,
                }
            },
        )
    }

    fn arb_evidence() -> impl Strategy<Value = EvidenceSet> {
        (
            prop::collection::vec(arb_passage(RegulationFamily::Gdpr), 0..6),
            prop::collection::vec(arb_passage(RegulationFamily::Mica), 0..6),
        )
            .prop_map(|(gdpr, mica)| {
                EvidenceSet::from_parts(
                    [
                        (RegulationFamily::Gdpr, gdpr),
                        (RegulationFamily::Mica, mica),
                    ]
                    .into_iter()
                    .collect(),
                )
            })
    }

    proptest! {
        /// Identical inputs always yield the identical context ordering.
        #[test]
        fn assembly_is_deterministic(set in arb_evidence(), budget in 0usize..400) {
            let a = assemble_context(&set, budget);
            let b = assemble_context(&set, budget);
            prop_assert_eq!(a, b);
        }

        /// The context is never empty while any evidence exists.
        #[test]
        fn never_silently_empty(set in arb_evidence(), budget in 0usize..400) {
            let ctx = assemble_context(&set, budget);
            if !set.is_empty() {
                prop_assert!(!ctx.passages().is_empty());
            }
        }

        /// Beyond the first admission, the budget is respected.
        #[test]
        fn budget_respected_after_first(set in arb_evidence(), budget in 0usize..400) {
            let ctx = assemble_context(&set, budget);
            if ctx.passages().len() > 1 {
                prop_assert!(ctx.size_bytes() <= budget);
            }
        }

        /// Every requested family carries a coverage marker.
        #[test]
        fn coverage_total(set in arb_evidence(), budget in 0usize..400) {
            let ctx = assemble_context(&set, budget);
            for family in set.families() {
                prop_assert!(ctx.coverage().contains_key(&family));
            }
        }
    }
}

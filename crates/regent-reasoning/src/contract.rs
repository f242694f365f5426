//! # Output-Contract Validation — Strict Schema, Never Best-Effort
//!
//! The reasoning service's output is untrusted. This module parses the
//! raw response as strict JSON and validates every gap against the
//! context it was generated from:
//!
//! - the family must parse and must be one of the requested families;
//! - the severity must be one of the four defined bands;
//! - every evidence citation must name a passage id present in the
//!   context, and every gap must cite at least one.
//!
//! Validation rejects; it never repairs. An ungrounded gap is dropped
//! with the whole response, because silently fabricating or trimming
//! evidence would defeat the audit guarantee.

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

use regent_core::{RegulationFamily, Severity};
use regent_corpus::PassageId;
use regent_retrieval::ReasoningContext;

use crate::gap::ComplianceGap;

/// One specific way a response violated the output contract. The full
/// violation list is fed back verbatim in the corrective retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    /// The response was not a single JSON object of the expected shape.
    NotJson {
        /// Parser diagnostic.
        detail: String,
    },
    /// A gap named a family outside the supported vocabulary.
    UnknownFamily {
        /// The offending value.
        value: String,
    },
    /// A gap named a family that was not requested for this analysis.
    UnrequestedFamily {
        /// The offending family.
        family: RegulationFamily,
    },
    /// A gap used a severity outside the four defined bands.
    UnknownSeverity {
        /// The offending value.
        value: String,
    },
    /// A gap cited a passage id that is not in the reasoning context.
    OrphanCitation {
        /// Index of the gap in the response.
        gap_index: usize,
        /// The uncited-context passage id.
        id: String,
    },
    /// A gap cited no evidence at all.
    MissingCitation {
        /// Index of the gap in the response.
        gap_index: usize,
    },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotJson { detail } => write!(f, "response is not contract JSON: {detail}"),
            Self::UnknownFamily { value } => write!(f, "unknown regulation family {value:?}"),
            Self::UnrequestedFamily { family } => {
                write!(f, "family {family} was not requested for this analysis")
            }
            Self::UnknownSeverity { value } => write!(f, "unknown severity {value:?}"),
            Self::OrphanCitation { gap_index, id } => write!(
                f,
                "gap {gap_index} cites passage {id:?} which is not in the supplied context"
            ),
            Self::MissingCitation { gap_index } => {
                write!(f, "gap {gap_index} cites no evidence")
            }
        }
    }
}

/// Wire shape of one gap as the service emits it.
#[derive(Debug, Deserialize)]
struct RawGap {
    family: String,
    description: String,
    severity: String,
    #[serde(default)]
    evidence: Vec<String>,
    #[serde(default)]
    remediation: Option<String>,
}

/// Wire shape of the whole response.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    gaps: Vec<RawGap>,
}

/// Strip a single Markdown code fence if the service wrapped its JSON
/// in one. This is the only tolerated deviation from the contract.
fn strip_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Parse a raw response and validate it against the context and the
/// requested families.
///
/// Returns the typed gap list, or the complete list of violations for
/// the corrective retry. All violations are collected, not just the
/// first — the retry instruction names every problem at once.
pub fn parse_and_validate(
    content: &str,
    ctx: &ReasoningContext,
    requested: &BTreeSet<RegulationFamily>,
) -> Result<Vec<ComplianceGap>, Vec<ContractViolation>> {
    let raw: RawAnalysis = match serde_json::from_str(strip_fence(content)) {
        Ok(raw) => raw,
        Err(e) => {
            return Err(vec![ContractViolation::NotJson {
                detail: e.to_string(),
            }])
        }
    };

    let mut violations = Vec::new();
    let mut gaps = Vec::with_capacity(raw.gaps.len());

    for (index, raw_gap) in raw.gaps.into_iter().enumerate() {
        let violations_before = violations.len();
        let family = match raw_gap.family.parse::<RegulationFamily>() {
            Ok(family) if requested.contains(&family) => Some(family),
            Ok(family) => {
                violations.push(ContractViolation::UnrequestedFamily { family });
                None
            }
            Err(_) => {
                violations.push(ContractViolation::UnknownFamily {
                    value: raw_gap.family.clone(),
                });
                None
            }
        };

        let severity = match raw_gap.severity.parse::<Severity>() {
            Ok(severity) => Some(severity),
            Err(_) => {
                violations.push(ContractViolation::UnknownSeverity {
                    value: raw_gap.severity.clone(),
                });
                None
            }
        };

        if raw_gap.evidence.is_empty() {
            violations.push(ContractViolation::MissingCitation { gap_index: index });
        }
        let mut evidence = Vec::with_capacity(raw_gap.evidence.len());
        for id in &raw_gap.evidence {
            let passage_id = PassageId::new(id.clone());
            if ctx.contains(&passage_id) {
                evidence.push(passage_id);
            } else {
                violations.push(ContractViolation::OrphanCitation {
                    gap_index: index,
                    id: id.clone(),
                });
            }
        }

        if let (Some(family), Some(severity)) = (family, severity) {
            if violations.len() == violations_before {
                gaps.push(ComplianceGap {
                    family,
                    description: raw_gap.description,
                    severity,
                    evidence,
                    remediation: raw_gap.remediation,
                });
            }
        }
    }

    if violations.is_empty() {
        Ok(gaps)
    } else {
        Err(violations)
    }
}

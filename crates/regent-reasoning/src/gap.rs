//! # Compliance Gaps — Validated Reasoning Output
//!
//! A `ComplianceGap` is one identified shortfall between the project and
//! a regulation family's requirements. Gaps enter the pipeline only
//! through `contract::parse_and_validate`, which rejects empty evidence
//! lists and citations absent from the reasoning context. They are never
//! mutated afterwards, only aggregated by the scorer and the roadmap
//! generator.

use serde::{Deserialize, Serialize};

use regent_core::{RegulationFamily, Severity};
use regent_corpus::PassageId;

/// An identified compliance shortfall, grounded in cited evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceGap {
    /// The regulation family the gap falls under.
    pub family: RegulationFamily,
    /// Short description of the shortfall.
    pub description: String,
    /// Severity band (drives scoring weight and roadmap placement).
    pub severity: Severity,
    /// Evidence passage ids justifying the gap. Never empty; every id
    /// is guaranteed present in the context the gap was generated from.
    pub evidence: Vec<PassageId>,
    /// Optional remediation hint from the reasoning step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

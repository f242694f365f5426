//! # Audit Entry — The Full Record of One Analysis
//!
//! An entry captures everything needed to reconstruct how a report was
//! produced: the report itself, the exact reasoning context it was
//! generated from, the raw (unparsed) reasoning response, the
//! instruction template version, and token usage. `recorded_at` is
//! bookkeeping only; identity comes from the content hash.

use serde::{Deserialize, Serialize};

use regent_core::{ContentDigest, Timestamp};
use regent_reasoning::ReasoningUsage;
use regent_report::ComplianceReport;
use regent_retrieval::ReasoningContext;

/// One immutable audit record, keyed by `content_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Audit key: the report's content hash.
    pub content_hash: ContentDigest,
    /// The report as delivered to the caller.
    pub report: ComplianceReport,
    /// The evidence context the reasoning step saw.
    pub context: ReasoningContext,
    /// The raw reasoning response text, before contract parsing.
    pub raw_response: String,
    /// Version tag of the instruction template used.
    pub instruction_version: String,
    /// Token usage, when the reasoning service reported it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<ReasoningUsage>,
    /// When this entry was recorded. Not part of the audit key.
    pub recorded_at: Timestamp,
}

impl AuditEntry {
    /// Build an entry for a completed analysis. The key is taken from
    /// the report's content hash.
    pub fn new(
        report: ComplianceReport,
        context: ReasoningContext,
        raw_response: String,
        instruction_version: String,
        usage: Option<ReasoningUsage>,
        recorded_at: Timestamp,
    ) -> Self {
        Self {
            content_hash: report.content_hash,
            report,
            context,
            raw_response,
            instruction_version,
            usage,
            recorded_at,
        }
    }
}

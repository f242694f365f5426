//! # Report Assembly — The Content-Hashed Final Artifact
//!
//! Combines the profile, the validated gap list, the score breakdown,
//! and the roadmap into one `ComplianceReport`, keyed by a SHA-256
//! content hash over the canonical serialization of the analysis
//! inputs and outputs.
//!
//! ## Invariant
//!
//! The content hash covers `(profile, context, gaps, scores, roadmap)`
//! and deliberately excludes `created_at`: re-running an identical
//! analysis yields an identical hash, which is what makes audit
//! recording idempotent.

use serde::{Deserialize, Serialize};

use regent_core::{
    sha256_digest, CanonicalBytes, ContentDigest, CoreError, ProjectProfile, Timestamp,
};
use regent_reasoning::ComplianceGap;
use regent_retrieval::ReasoningContext;

use crate::roadmap::{build_roadmap, Milestone};
use crate::score::{score_gaps, ScoreBreakdown};

/// The final advisory artifact: gaps, scores, roadmap, and the content
/// hash keying the audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// The profile the analysis was run against.
    pub profile: ProjectProfile,
    /// Validated gaps, in the order the reasoning step produced them.
    pub gaps: Vec<ComplianceGap>,
    /// Aggregate and per-family scores.
    pub scores: ScoreBreakdown,
    /// Severity-ordered remediation milestones.
    pub roadmap: Vec<Milestone>,
    /// Report creation time. Excluded from the content hash.
    pub created_at: Timestamp,
    /// SHA-256 over the canonical hash input. Audit key.
    pub content_hash: ContentDigest,
}

/// Exactly the fields the content hash covers, in a fixed shape.
/// Timestamps never appear here.
#[derive(Serialize)]
struct HashInput<'a> {
    profile: &'a ProjectProfile,
    context: &'a ReasoningContext,
    gaps: &'a [ComplianceGap],
    scores: &'a ScoreBreakdown,
    roadmap: &'a [Milestone],
}

/// Assemble the final report from the validated gap list.
///
/// Scoring and roadmap generation are recomputed here rather than
/// accepted from the caller, so a report's scores always match its
/// gaps.
///
/// # Errors
///
/// `CoreError::Canonicalization` if the hash input cannot be
/// canonically serialized. All field types are float-free by
/// construction, so this indicates a serialization bug rather than bad
/// input.
pub fn build_report(
    profile: &ProjectProfile,
    context: &ReasoningContext,
    gaps: Vec<ComplianceGap>,
    created_at: Timestamp,
) -> Result<ComplianceReport, CoreError> {
    let scores = score_gaps(profile.families(), &gaps);
    let roadmap = build_roadmap(&gaps);

    let canonical = CanonicalBytes::new(&HashInput {
        profile,
        context,
        gaps: &gaps,
        scores: &scores,
        roadmap: &roadmap,
    })?;
    let content_hash = sha256_digest(&canonical);

    Ok(ComplianceReport {
        profile: profile.clone(),
        gaps,
        scores,
        roadmap,
        created_at,
        content_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    use regent_core::{ProjectAttributes, RegulationFamily, Severity};
    use regent_corpus::{EvidencePassage, PassageId, Provenance, RelevanceBps, SourceKind};
    use regent_retrieval::{assemble_context, EvidenceSet};

    fn profile(families: &[RegulationFamily]) -> ProjectProfile {
        ProjectProfile::new(
            "MyStakingPool",
            "A decentralized staking pool for EU retail users.",
            families.iter().copied().collect::<BTreeSet<_>>(),
            ProjectAttributes::default(),
        )
        .unwrap()
    }

    fn passage(family: RegulationFamily, doc: &str) -> EvidencePassage {
        let provenance = Provenance {
            document_id: doc.into(),
            offset: 0,
        };
        EvidencePassage {
            id: provenance.passage_id(),
            source: "GDPR Art. 17".into(),
            kind: SourceKind::Regulation,
            family,
            excerpt: "the data subject shall have the right to erasure".into(),
            relevance: RelevanceBps::from_score(0.9),
            provenance,
        }
    }

    fn context(families: &[RegulationFamily]) -> ReasoningContext {
        let mut by_family: BTreeMap<RegulationFamily, Vec<EvidencePassage>> = BTreeMap::new();
        for (i, family) in families.iter().enumerate() {
            by_family.insert(*family, vec![passage(*family, &format!("doc-{i}"))]);
        }
        assemble_context(&EvidenceSet::from_parts(by_family), 64 * 1024)
    }

    fn gdpr_gap() -> ComplianceGap {
        ComplianceGap {
            family: RegulationFamily::Gdpr,
            description: "no erasure process for delegator records".into(),
            severity: Severity::High,
            evidence: vec![PassageId::new("doc-0@0")],
            remediation: Some("implement an erasure workflow".into()),
        }
    }

    #[test]
    fn report_scores_match_its_gaps() {
        let families = [RegulationFamily::Gdpr, RegulationFamily::Mica];
        let profile = profile(&families);
        let ctx = context(&families);

        let report =
            build_report(&profile, &ctx, vec![gdpr_gap()], Timestamp::now()).unwrap();

        assert_eq!(report.scores.aggregate, 85);
        assert_eq!(
            report.scores.per_family.get(&RegulationFamily::Gdpr),
            Some(&70)
        );
        assert_eq!(report.roadmap.len(), 1);
        assert_eq!(report.roadmap[0].severity, Severity::High);
    }

    #[test]
    fn content_hash_ignores_created_at() {
        let families = [RegulationFamily::Gdpr, RegulationFamily::Mica];
        let profile = profile(&families);
        let ctx = context(&families);

        let a = build_report(
            &profile,
            &ctx,
            vec![gdpr_gap()],
            Timestamp::parse("2026-01-01T00:00:00Z").unwrap(),
        )
        .unwrap();
        let b = build_report(
            &profile,
            &ctx,
            vec![gdpr_gap()],
            Timestamp::parse("2026-06-15T12:30:00Z").unwrap(),
        )
        .unwrap();

        assert_ne!(a.created_at, b.created_at);
        assert_eq!(a.content_hash, b.content_hash);
    }

    #[test]
    fn content_hash_changes_with_gaps() {
        let families = [RegulationFamily::Gdpr];
        let profile = profile(&families);
        let ctx = context(&families);
        let now = Timestamp::now();

        let with_gap = build_report(&profile, &ctx, vec![gdpr_gap()], now).unwrap();
        let without = build_report(&profile, &ctx, vec![], now).unwrap();

        assert_ne!(with_gap.content_hash, without.content_hash);
    }

    #[test]
    fn content_hash_changes_with_profile() {
        let families = [RegulationFamily::Gdpr];
        let ctx = context(&families);
        let now = Timestamp::now();

        let a = build_report(&profile(&families), &ctx, vec![], now).unwrap();
        let other = ProjectProfile::new(
            "OtherPool",
            "A different staking pool.",
            families.iter().copied().collect::<BTreeSet<_>>(),
            ProjectAttributes::default(),
        )
        .unwrap();
        let b = build_report(&other, &ctx, vec![], now).unwrap();

        assert_ne!(a.content_hash, b.content_hash);
    }

    #[test]
    fn report_round_trips_through_json() {
        let families = [RegulationFamily::Gdpr, RegulationFamily::Mica];
        let report = build_report(
            &profile(&families),
            &context(&families),
            vec![gdpr_gap()],
            Timestamp::now(),
        )
        .unwrap();

        let json = serde_json::to_string(&report).unwrap();
        let back: ComplianceReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}

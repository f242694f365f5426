//! # Roadmap Generator — Severity-Driven Remediation Plan
//!
//! Maps gap severities to timeline and cost bands through fixed lookup
//! tables, merges gaps of identical (family, severity) into one
//! milestone, and orders milestones by descending severity with family
//! order as the tie-break. Pure and deterministic.

use serde::{Deserialize, Serialize};

use regent_core::{RegulationFamily, Severity};
use regent_reasoning::ComplianceGap;

/// Remediation timeline band for a milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineBand {
    /// Blocking: remediate before (continued) operation.
    Immediate,
    /// Remediate within one to three months.
    OneToThreeMonths,
    /// Remediate within three to six months.
    ThreeToSixMonths,
    /// Advisory cleanup, within a month of convenience.
    ZeroToOneMonth,
}

impl TimelineBand {
    /// Human-readable band label used in rendered reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "immediate/blocking",
            Self::OneToThreeMonths => "1-3 months",
            Self::ThreeToSixMonths => "3-6 months",
            Self::ZeroToOneMonth => "0-1 month",
        }
    }
}

impl std::fmt::Display for TimelineBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remediation cost band for a milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostBand {
    /// Configuration or documentation level effort.
    Low,
    /// Meaningful engineering or process work.
    Moderate,
    /// Dedicated workstream, possibly external counsel.
    High,
    /// Structural change: licensing, re-architecture, or both.
    VeryHigh,
}

/// Fixed severity → timeline lookup.
fn timeline_for(severity: Severity) -> TimelineBand {
    match severity {
        Severity::Critical => TimelineBand::Immediate,
        Severity::High => TimelineBand::OneToThreeMonths,
        Severity::Medium => TimelineBand::ThreeToSixMonths,
        Severity::Low => TimelineBand::ZeroToOneMonth,
    }
}

/// Fixed severity → cost lookup.
fn cost_for(severity: Severity) -> CostBand {
    match severity {
        Severity::Critical => CostBand::VeryHigh,
        Severity::High => CostBand::High,
        Severity::Medium => CostBand::Moderate,
        Severity::Low => CostBand::Low,
    }
}

/// One remediation milestone: all gaps of one severity within one
/// family, with the banded timeline and cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// The regulation family being remediated.
    pub family: RegulationFamily,
    /// Severity of the merged gaps.
    pub severity: Severity,
    /// Timeline band from the fixed lookup.
    pub timeline: TimelineBand,
    /// Cost band from the fixed lookup.
    pub cost: CostBand,
    /// Descriptions of the merged gaps, in gap-list order.
    pub actions: Vec<String>,
}

/// Build the remediation roadmap from the validated gap list.
///
/// Milestones are ordered by descending severity, then by family in
/// canonical order; gaps sharing (family, severity) merge into one
/// milestone.
pub fn build_roadmap(gaps: &[ComplianceGap]) -> Vec<Milestone> {
    let mut milestones: Vec<Milestone> = Vec::new();

    for gap in gaps {
        match milestones
            .iter_mut()
            .find(|m| m.family == gap.family && m.severity == gap.severity)
        {
            Some(milestone) => milestone.actions.push(gap.description.clone()),
            None => milestones.push(Milestone {
                family: gap.family,
                severity: gap.severity,
                timeline: timeline_for(gap.severity),
                cost: cost_for(gap.severity),
                actions: vec![gap.description.clone()],
            }),
        }
    }

    milestones.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.family.cmp(&b.family))
    });
    milestones
}

#[cfg(test)]
mod tests {
    use super::*;
    use regent_corpus::PassageId;

    fn gap(family: RegulationFamily, severity: Severity, description: &str) -> ComplianceGap {
        ComplianceGap {
            family,
            description: description.into(),
            severity,
            evidence: vec![PassageId::new("doc@0")],
            remediation: None,
        }
    }

    #[test]
    fn single_high_gap_yields_one_to_three_months() {
        let roadmap = build_roadmap(&[gap(
            RegulationFamily::Gdpr,
            Severity::High,
            "data retention",
        )]);
        assert_eq!(roadmap.len(), 1);
        assert_eq!(roadmap[0].timeline, TimelineBand::OneToThreeMonths);
        assert_eq!(roadmap[0].timeline.as_str(), "1-3 months");
        assert_eq!(roadmap[0].cost, CostBand::High);
    }

    #[test]
    fn identical_family_and_severity_merge() {
        let roadmap = build_roadmap(&[
            gap(RegulationFamily::Gdpr, Severity::Medium, "a"),
            gap(RegulationFamily::Gdpr, Severity::Medium, "b"),
        ]);
        assert_eq!(roadmap.len(), 1);
        assert_eq!(roadmap[0].actions, vec!["a", "b"]);
    }

    #[test]
    fn same_severity_different_family_stay_distinct() {
        let roadmap = build_roadmap(&[
            gap(RegulationFamily::Mica, Severity::High, "a"),
            gap(RegulationFamily::Gdpr, Severity::High, "b"),
        ]);
        assert_eq!(roadmap.len(), 2);
        // Family tie-break: GDPR sorts before MiCA.
        assert_eq!(roadmap[0].family, RegulationFamily::Gdpr);
    }

    #[test]
    fn milestones_ordered_by_descending_severity() {
        let roadmap = build_roadmap(&[
            gap(RegulationFamily::Gdpr, Severity::Low, "l"),
            gap(RegulationFamily::Mica, Severity::Critical, "c"),
            gap(RegulationFamily::Psd2, Severity::Medium, "m"),
        ]);
        let severities: Vec<_> = roadmap.iter().map(|m| m.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Critical, Severity::Medium, Severity::Low]
        );
        assert_eq!(roadmap[0].timeline, TimelineBand::Immediate);
        assert_eq!(roadmap[0].cost, CostBand::VeryHigh);
    }

    #[test]
    fn empty_gap_list_means_empty_roadmap() {
        assert!(build_roadmap(&[]).is_empty());
    }
}

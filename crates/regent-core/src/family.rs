//! # Regulation Families — The Retrieval and Scoring Partition
//!
//! A regulation family is a named regulatory regime (GDPR, MiCA, …) used
//! to partition corpus retrieval, context coverage, and score aggregation.
//!
//! The enum is closed on purpose: every `match` on `RegulationFamily` is
//! exhaustive, so adding a regime is a compile error until retrieval,
//! context assembly, and scoring all handle it. The supported set mirrors
//! the regimes the corpus is ingested under.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of supported regulation families.
pub const REGULATION_FAMILY_COUNT: usize = 6;

/// A named regulatory regime used as a retrieval and scoring partition.
///
/// Ordering is the canonical presentation order (used for deterministic
/// iteration over `BTreeSet`/`BTreeMap` keyed by family).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegulationFamily {
    /// General Data Protection Regulation (EU) 2016/679.
    #[serde(rename = "GDPR")]
    Gdpr,
    /// Markets in Crypto-Assets Regulation (EU) 2023/1114.
    #[serde(rename = "MiCA")]
    Mica,
    /// Markets in Financial Instruments Directive II.
    #[serde(rename = "MiFID2")]
    Mifid2,
    /// Revised Payment Services Directive (EU) 2015/2366.
    #[serde(rename = "PSD2")]
    Psd2,
    /// EU Artificial Intelligence Act.
    #[serde(rename = "EU AI Act")]
    AiAct,
    /// Anti-Money Laundering Directives (4AMLD/5AMLD/6AMLD provisions).
    #[serde(rename = "AMLD")]
    Amld,
}

impl RegulationFamily {
    /// All supported families in canonical order.
    pub const ALL: [RegulationFamily; REGULATION_FAMILY_COUNT] = [
        Self::Gdpr,
        Self::Mica,
        Self::Mifid2,
        Self::Psd2,
        Self::AiAct,
        Self::Amld,
    ];

    /// Canonical spelling, as used in corpus tags and serialized reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gdpr => "GDPR",
            Self::Mica => "MiCA",
            Self::Mifid2 => "MiFID2",
            Self::Psd2 => "PSD2",
            Self::AiAct => "EU AI Act",
            Self::Amld => "AMLD",
        }
    }
}

impl fmt::Display for RegulationFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegulationFamily {
    type Err = CoreError;

    /// Parse a family from its canonical spelling, case-insensitively.
    /// Common corpus variants ("MICA", "AI Act", "EU_AI_ACT") are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "GDPR" => Ok(Self::Gdpr),
            "MICA" => Ok(Self::Mica),
            "MIFID2" | "MIFID II" => Ok(Self::Mifid2),
            "PSD2" => Ok(Self::Psd2),
            "EU AI ACT" | "AI ACT" | "AIACT" => Ok(Self::AiAct),
            "AMLD" | "AML" => Ok(Self::Amld),
            _ => Err(CoreError::UnknownValue(format!(
                "unknown regulation family: {s:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_spellings_round_trip() {
        for family in RegulationFamily::ALL {
            let parsed: RegulationFamily = family.as_str().parse().unwrap();
            assert_eq!(parsed, family);
        }
    }

    #[test]
    fn test_corpus_variants_accepted() {
        assert_eq!(
            "MICA".parse::<RegulationFamily>().unwrap(),
            RegulationFamily::Mica
        );
        assert_eq!(
            "ai_act".parse::<RegulationFamily>().unwrap(),
            RegulationFamily::AiAct
        );
        assert_eq!(
            "MiFID II".parse::<RegulationFamily>().unwrap(),
            RegulationFamily::Mifid2
        );
    }

    #[test]
    fn test_unknown_family_rejected() {
        assert!("SOX".parse::<RegulationFamily>().is_err());
        assert!("".parse::<RegulationFamily>().is_err());
    }

    #[test]
    fn test_serde_uses_canonical_spelling() {
        let json = serde_json::to_string(&RegulationFamily::Mica).unwrap();
        assert_eq!(json, r#""MiCA""#);
        let back: RegulationFamily = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RegulationFamily::Mica);
    }

    #[test]
    fn test_all_covers_every_variant() {
        assert_eq!(RegulationFamily::ALL.len(), REGULATION_FAMILY_COUNT);
    }
}

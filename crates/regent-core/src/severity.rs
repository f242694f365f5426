//! # Severity Bands — Gap Weight and Roadmap Driver
//!
//! The four severity bands drive both scoring (fixed additive weights)
//! and roadmap generation (timeline and cost bands). Ordering is
//! `Low < Medium < High < Critical`, so sorting gaps by descending
//! severity puts blocking findings first.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Severity of an identified compliance gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Advisory finding; no enforcement exposure on its own.
    Low,
    /// Shortfall that regulators expect remediated on a normal cycle.
    Medium,
    /// Material shortfall with realistic enforcement exposure.
    High,
    /// Blocking finding; operating without remediation risks immediate action.
    Critical,
}

impl Severity {
    /// Fixed scoring weight. Sub-scores are `100 − Σ weight`, saturating
    /// at zero, so two criticals cannot drive a family below zero twice.
    pub fn weight(self) -> u32 {
        match self {
            Self::Low => 5,
            Self::Medium => 15,
            Self::High => 30,
            Self::Critical => 50,
        }
    }

    /// Canonical lowercase spelling, as required by the reasoning
    /// output contract.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(CoreError::UnknownValue(format!("unknown severity: {s:?}"))),
        }
    }
}

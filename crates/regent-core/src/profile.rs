//! # Project Profile — The Immutable Analysis Input
//!
//! A `ProjectProfile` is what a caller submits for analysis: a name, a
//! free-text description, the set of regulation families to assess, and
//! optional structured attributes. The profile is immutable once
//! constructed and is part of every audit hash input.
//!
//! The non-empty-family-set invariant holds through deserialization via
//! `try_from`, so a profile arriving over a wire boundary cannot bypass
//! validation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::family::RegulationFamily;

/// Optional structured attributes of a project under analysis.
///
/// These sharpen corpus retrieval (they are appended to the similarity
/// query) and give the reasoning step concrete facts to assess against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAttributes {
    /// Primary operating jurisdiction, e.g. "EU", "DE".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    /// Token model, e.g. "utility token", "e-money token".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_model: Option<String>,
    /// Custody model, e.g. "self-custody", "qualified custodian".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custody_model: Option<String>,
}

impl ProjectAttributes {
    /// True if no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.jurisdiction.is_none() && self.token_model.is_none() && self.custody_model.is_none()
    }
}

/// An immutable project submission: name, description, requested
/// regulation families (non-empty), optional structured attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProfileWire")]
pub struct ProjectProfile {
    name: String,
    description: String,
    families: BTreeSet<RegulationFamily>,
    #[serde(skip_serializing_if = "ProjectAttributes::is_empty", default)]
    attributes: ProjectAttributes,
}

/// Wire shape for deserialization; converted through the validating
/// constructor so the non-empty invariant survives `serde_json::from_*`.
#[derive(Deserialize)]
struct ProfileWire {
    name: String,
    description: String,
    families: BTreeSet<RegulationFamily>,
    #[serde(default)]
    attributes: ProjectAttributes,
}

impl TryFrom<ProfileWire> for ProjectProfile {
    type Error = CoreError;

    fn try_from(wire: ProfileWire) -> Result<Self, Self::Error> {
        ProjectProfile::new(wire.name, wire.description, wire.families, wire.attributes)
    }
}

impl ProjectProfile {
    /// Construct a profile, rejecting an empty family set or blank
    /// name/description.
    ///
    /// # Errors
    ///
    /// `CoreError::InvalidProfile` when a constraint is violated.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        families: BTreeSet<RegulationFamily>,
        attributes: ProjectAttributes,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        let description = description.into();
        if name.trim().is_empty() {
            return Err(CoreError::InvalidProfile("name must not be blank".into()));
        }
        if description.trim().is_empty() {
            return Err(CoreError::InvalidProfile(
                "description must not be blank".into(),
            ));
        }
        if families.is_empty() {
            return Err(CoreError::InvalidProfile(
                "at least one regulation family must be requested".into(),
            ));
        }
        Ok(Self {
            name,
            description,
            families,
            attributes,
        })
    }

    /// Project name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text project description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Requested regulation families, in canonical order. Never empty.
    pub fn families(&self) -> &BTreeSet<RegulationFamily> {
        &self.families
    }

    /// Structured attributes (possibly all unset).
    pub fn attributes(&self) -> &ProjectAttributes {
        &self.attributes
    }
}

//! Engine error taxonomy.
//!
//! Each variant tells the caller whether retrying the same request can
//! help. Contract violations and invalid profiles are deterministic:
//! the same input will fail the same way, so they are not retryable.

use thiserror::Error;

use regent_core::CoreError;
use regent_reasoning::ReasoningError;
use regent_retrieval::RetrievalError;

/// Failure of one analysis, surfaced to the caller.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The corpus store could not be reached. Fatal to the analysis:
    /// reasoning without evidence is unsafe, so there is no fallback.
    #[error("evidence retrieval unavailable: {reason}")]
    RetrievalUnavailable { reason: String },

    /// The reasoning service stayed unreachable through the transport
    /// retry budget.
    #[error("reasoning service unavailable after {attempts} attempts: {reason}")]
    ReasoningServiceUnavailable { attempts: u32, reason: String },

    /// The reasoning service kept violating the output contract. Never
    /// repaired by fabricating evidence.
    #[error("reasoning output violated its contract after {attempts} attempts: {violations:?}")]
    ReasoningContractViolation {
        attempts: u32,
        violations: Vec<String>,
    },

    /// The audit backend failed. `analyze` never returns this — audit
    /// failure is flagged on the outcome instead — but audit queries do.
    #[error("audit persistence failed: {reason}")]
    AuditPersistenceFailed { reason: String },

    /// The admission queue is full. Retry later.
    #[error("engine overloaded: reasoning admission queue is full")]
    EngineOverloaded,

    /// The submitted profile failed validation.
    #[error("invalid project profile: {reason}")]
    InvalidProfile { reason: String },

    /// Report assembly failed to canonicalize. All report field types
    /// are float-free by construction, so this indicates a bug, not bad
    /// caller input.
    #[error("report assembly failed: {reason}")]
    ReportAssembly { reason: String },
}

impl EngineError {
    /// Whether retrying the identical request can plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RetrievalUnavailable { .. }
            | Self::ReasoningServiceUnavailable { .. }
            | Self::AuditPersistenceFailed { .. }
            | Self::EngineOverloaded => true,
            Self::ReasoningContractViolation { .. }
            | Self::InvalidProfile { .. }
            | Self::ReportAssembly { .. } => false,
        }
    }
}

impl From<RetrievalError> for EngineError {
    fn from(err: RetrievalError) -> Self {
        EngineError::RetrievalUnavailable {
            reason: err.to_string(),
        }
    }
}

impl From<ReasoningError> for EngineError {
    fn from(err: ReasoningError) -> Self {
        match err {
            ReasoningError::ServiceUnavailable { attempts, reason } => {
                EngineError::ReasoningServiceUnavailable { attempts, reason }
            }
            ReasoningError::ContractViolation {
                attempts,
                violations,
            } => EngineError::ReasoningContractViolation {
                attempts,
                violations,
            },
        }
    }
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidProfile(reason) => EngineError::InvalidProfile { reason },
            other => EngineError::ReportAssembly {
                reason: other.to_string(),
            },
        }
    }
}

//! Engine configuration.
//!
//! Every knob is settable through a `REGENT_*` environment variable and
//! has a production default. A variable that is present but does not
//! parse is an error, not a silent fallback to the default.

use std::time::Duration;

use regent_reasoning::ReasoningPolicy;
use thiserror::Error;

/// Tunable parameters of the analysis pipeline.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Passages requested from the corpus per family.
    pub retrieval_k: usize,
    /// Context budget in excerpt bytes.
    pub context_budget_bytes: usize,
    /// Per-call reasoning deadline.
    pub reasoning_timeout: Duration,
    /// Transport attempts per reasoning generation.
    pub reasoning_transport_attempts: u32,
    /// Contract attempts per analysis (initial + corrective retries).
    pub reasoning_contract_attempts: u32,
    /// Maximum concurrent reasoning calls per process.
    pub reasoning_concurrency_cap: usize,
    /// Analyses allowed to wait for a reasoning slot before the engine
    /// starts failing fast.
    pub reasoning_queue_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retrieval_k: 10,
            context_budget_bytes: 32 * 1024,
            reasoning_timeout: Duration::from_secs(30),
            reasoning_transport_attempts: 3,
            reasoning_contract_attempts: 2,
            reasoning_concurrency_cap: 4,
            reasoning_queue_depth: 16,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the environment.
    ///
    /// Variables (all optional, defaults in parentheses):
    /// - `REGENT_RETRIEVAL_K` (10)
    /// - `REGENT_CONTEXT_BUDGET_BYTES` (32768)
    /// - `REGENT_REASONING_TIMEOUT_SECS` (30)
    /// - `REGENT_REASONING_TRANSPORT_ATTEMPTS` (3)
    /// - `REGENT_REASONING_CONTRACT_ATTEMPTS` (2)
    /// - `REGENT_REASONING_CONCURRENCY_CAP` (4)
    /// - `REGENT_REASONING_QUEUE_DEPTH` (16)
    ///
    /// # Errors
    ///
    /// `ConfigError` when a variable is set but unparseable, or when a
    /// parsed value violates a constraint (counts and caps must be
    /// positive; the queue depth may be zero).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            retrieval_k: env_parse("REGENT_RETRIEVAL_K", defaults.retrieval_k)?,
            context_budget_bytes: env_parse(
                "REGENT_CONTEXT_BUDGET_BYTES",
                defaults.context_budget_bytes,
            )?,
            reasoning_timeout: Duration::from_secs(env_parse(
                "REGENT_REASONING_TIMEOUT_SECS",
                defaults.reasoning_timeout.as_secs(),
            )?),
            reasoning_transport_attempts: env_parse(
                "REGENT_REASONING_TRANSPORT_ATTEMPTS",
                defaults.reasoning_transport_attempts,
            )?,
            reasoning_contract_attempts: env_parse(
                "REGENT_REASONING_CONTRACT_ATTEMPTS",
                defaults.reasoning_contract_attempts,
            )?,
            reasoning_concurrency_cap: env_parse(
                "REGENT_REASONING_CONCURRENCY_CAP",
                defaults.reasoning_concurrency_cap,
            )?,
            reasoning_queue_depth: env_parse(
                "REGENT_REASONING_QUEUE_DEPTH",
                defaults.reasoning_queue_depth,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval_k == 0 {
            return Err(ConfigError::OutOfRange {
                var: "REGENT_RETRIEVAL_K",
                reason: "must be at least 1",
            });
        }
        if self.reasoning_timeout.is_zero() {
            return Err(ConfigError::OutOfRange {
                var: "REGENT_REASONING_TIMEOUT_SECS",
                reason: "must be at least 1",
            });
        }
        if self.reasoning_transport_attempts == 0 {
            return Err(ConfigError::OutOfRange {
                var: "REGENT_REASONING_TRANSPORT_ATTEMPTS",
                reason: "must be at least 1",
            });
        }
        if self.reasoning_contract_attempts == 0 {
            return Err(ConfigError::OutOfRange {
                var: "REGENT_REASONING_CONTRACT_ATTEMPTS",
                reason: "must be at least 1",
            });
        }
        if self.reasoning_concurrency_cap == 0 {
            return Err(ConfigError::OutOfRange {
                var: "REGENT_REASONING_CONCURRENCY_CAP",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// The retry and deadline policy handed to the reasoning step.
    pub fn reasoning_policy(&self) -> ReasoningPolicy {
        ReasoningPolicy {
            timeout: self.reasoning_timeout,
            transport_attempts: self.reasoning_transport_attempts,
            contract_attempts: self.reasoning_contract_attempts,
        }
    }
}

fn env_parse<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            var,
            value: raw,
        }),
    }
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A variable was set but did not parse as the expected type.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    /// A value parsed but violates a constraint.
    #[error("{var} out of range: {reason}")]
    OutOfRange {
        var: &'static str,
        reason: &'static str,
    },
}

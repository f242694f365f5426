//! # Reasoning Orchestrator — Bounded Retries, Honest Failures
//!
//! Two independent retry loops, with different budgets, wrap the
//! generative call:
//!
//! - **Transport**: connection failures, 5xx, and timeouts are retried
//!   with exponential backoff (200ms base, doubling) up to the
//!   configured attempt count, then surface as `ServiceUnavailable`.
//! - **Contract**: a response that parses but violates the output
//!   contract gets exactly one corrective retry with the violations
//!   appended to the instructions. A second violation surfaces as
//!   `ContractViolation` — the analysis fails rather than shipping an
//!   ungrounded report.
//!
//! The per-call timeout is enforced here (not in the HTTP client) so
//! every `ReasoningService` implementation gets the same deadline
//! semantics.

use std::collections::BTreeSet;
use std::time::Duration;

use thiserror::Error;

use regent_core::{ProjectProfile, RegulationFamily};
use regent_retrieval::ReasoningContext;

use crate::contract::parse_and_validate;
use crate::gap::ComplianceGap;
use crate::prompt::{
    analysis_instructions, corrective_instructions, render_context, INSTRUCTION_VERSION,
};
use crate::service::{ReasoningRequest, ReasoningService, ReasoningUsage, TransportError};

/// Base delay between transport retries (doubles each attempt).
const BASE_BACKOFF_MS: u64 = 200;

/// Retry and deadline budgets for one analysis.
#[derive(Debug, Clone)]
pub struct ReasoningPolicy {
    /// Per-call deadline. A call exceeding it counts as a transport
    /// failure.
    pub timeout: Duration,
    /// Total transport attempts per generation (default 3).
    pub transport_attempts: u32,
    /// Total contract attempts per analysis (default 2: one initial,
    /// one corrective).
    pub contract_attempts: u32,
}

impl Default for ReasoningPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            transport_attempts: 3,
            contract_attempts: 2,
        }
    }
}

/// Failure of the reasoning step, after all retry budgets are spent.
#[derive(Error, Debug)]
pub enum ReasoningError {
    /// The service could not be reached within the transport budget.
    #[error("reasoning service unavailable after {attempts} attempts: {reason}")]
    ServiceUnavailable {
        /// Transport attempts made.
        attempts: u32,
        /// Last transport failure.
        reason: String,
    },

    /// The service kept violating the output contract.
    #[error("reasoning output violated the contract after {attempts} attempts: {violations:?}")]
    ContractViolation {
        /// Contract attempts made.
        attempts: u32,
        /// Violations from the final rejected response.
        violations: Vec<String>,
    },
}

/// The validated result of the reasoning step, with everything the
/// audit entry needs to reproduce it.
#[derive(Debug, Clone)]
pub struct ReasoningOutcome {
    /// Contract-validated gaps (every citation grounded in the context).
    pub gaps: Vec<ComplianceGap>,
    /// The raw response text the gaps were parsed from.
    pub raw_response: String,
    /// Token accounting, when the service reported it.
    pub usage: Option<ReasoningUsage>,
    /// The instruction template version in force.
    pub instruction_version: &'static str,
}

/// One generation with timeout and transport backoff.
async fn generate_with_backoff<R: ReasoningService>(
    service: &R,
    request: &ReasoningRequest,
    policy: &ReasoningPolicy,
) -> Result<crate::service::ReasoningResponse, ReasoningError> {
    let attempts = policy.transport_attempts.max(1);
    let mut last_reason = String::new();

    for attempt in 0..attempts {
        let call = service.generate(request);
        let outcome = match tokio::time::timeout(policy.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                elapsed_ms: policy.timeout.as_millis() as u64,
            }),
        };
        match outcome {
            Ok(response) => return Ok(response),
            Err(e) => {
                last_reason = e.to_string();
                if attempt + 1 < attempts {
                    let delay = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt));
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        "reasoning call failed, retrying in {delay:?}: {last_reason}"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(ReasoningError::ServiceUnavailable {
        attempts,
        reason: last_reason,
    })
}

/// Run the reasoning step: generate, validate, correct once, give up
/// honestly.
pub async fn run_analysis<R: ReasoningService>(
    service: &R,
    policy: &ReasoningPolicy,
    profile: &ProjectProfile,
    ctx: &ReasoningContext,
) -> Result<ReasoningOutcome, ReasoningError> {
    let requested: BTreeSet<RegulationFamily> = profile.families().clone();
    let base_instructions = analysis_instructions(profile);
    let rendered_context = render_context(ctx);

    let contract_attempts = policy.contract_attempts.max(1);
    let mut instructions = base_instructions.clone();
    let mut last_violations: Vec<String> = Vec::new();

    for attempt in 0..contract_attempts {
        let request = ReasoningRequest {
            instructions: instructions.clone(),
            context: rendered_context.clone(),
        };
        let response = generate_with_backoff(service, &request, policy).await?;

        match parse_and_validate(&response.content, ctx, &requested) {
            Ok(gaps) => {
                tracing::info!(
                    gaps = gaps.len(),
                    attempt = attempt + 1,
                    "reasoning output accepted"
                );
                return Ok(ReasoningOutcome {
                    gaps,
                    raw_response: response.content,
                    usage: response.usage,
                    instruction_version: INSTRUCTION_VERSION,
                });
            }
            Err(violations) => {
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = contract_attempts,
                    violations = violations.len(),
                    "reasoning output rejected by contract validation"
                );
                last_violations = violations.iter().map(ToString::to_string).collect();
                instructions = corrective_instructions(&base_instructions, &violations);
            }
        }
    }

    Err(ReasoningError::ContractViolation {
        attempts: contract_attempts,
        violations: last_violations,
    })
}

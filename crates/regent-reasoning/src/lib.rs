//! # regent-reasoning — Orchestrating the Generative Reasoning Step
//!
//! The generative reasoning service is the one non-deterministic,
//! untrusted component in the pipeline. This crate tames it with the
//! contract-validation-plus-bounded-retry pattern:
//!
//! 1. A **versioned instruction template** ([`prompt`]) fixes the output
//!    contract: a JSON list of gap objects, each citing evidence passage
//!    ids from the supplied context.
//! 2. **Strict validation** ([`contract`]) parses the response and
//!    rejects unknown severities, unrequested families, and citations
//!    not present in the context. Rejected output is never repaired.
//! 3. The **orchestrator** ([`orchestrator`]) retries a contract
//!    violation exactly once with a corrective instruction, and retries
//!    transport failures with bounded exponential backoff. After the
//!    limits, the caller gets an honest error, not a fabricated report.
//!
//! The service itself sits behind the [`ReasoningService`] trait;
//! production uses the reqwest-backed [`HttpReasoningService`], tests
//! use in-crate mocks.

pub mod contract;
pub mod gap;
pub mod http;
pub mod orchestrator;
pub mod prompt;
pub mod service;

pub use contract::{parse_and_validate, ContractViolation};
pub use gap::ComplianceGap;
pub use http::{HttpReasoningService, ReasoningServiceConfig};
pub use orchestrator::{run_analysis, ReasoningError, ReasoningOutcome, ReasoningPolicy};
pub use prompt::INSTRUCTION_VERSION;
pub use service::{ReasoningRequest, ReasoningResponse, ReasoningService, ReasoningUsage, TransportError};

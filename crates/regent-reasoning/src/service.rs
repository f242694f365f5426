//! # Reasoning Service Trait — The Generative Boundary
//!
//! The engine talks to the generative reasoning service through one
//! operation: `generate(request) → response`. The trait deals purely in
//! transport; contract validation of the response content happens in
//! the orchestrator, because the service's output is untrusted by
//! design.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single generation request: instructions plus serialized context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningRequest {
    /// The versioned instruction template (possibly with a corrective
    /// addendum on retry).
    pub instructions: String,
    /// The serialized reasoning context (passages + coverage markers).
    pub context: String,
}

/// Token accounting reported by the reasoning service, recorded in the
/// audit entry alongside the raw response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningUsage {
    /// Tokens consumed by the request.
    pub input_tokens: u64,
    /// Tokens produced in the response.
    pub output_tokens: u64,
}

/// The raw service response, before any contract validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningResponse {
    /// Raw response text (expected, but not trusted, to be contract JSON).
    pub content: String,
    /// Token usage, when the service reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<ReasoningUsage>,
}

/// Transport-level failures from the reasoning service.
///
/// These are the retryable class: the orchestrator applies bounded
/// exponential backoff before giving up with `ReasoningServiceUnavailable`.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection failure, 5xx, or protocol error.
    #[error("reasoning service error: {reason}")]
    Unavailable {
        /// Diagnostic detail.
        reason: String,
    },

    /// The per-call deadline elapsed.
    #[error("reasoning service timed out after {elapsed_ms}ms")]
    Timeout {
        /// Elapsed time before the deadline fired.
        elapsed_ms: u64,
    },
}

/// The generative reasoning boundary.
///
/// Implementations must be `Send + Sync` and stateless between calls;
/// the engine holds one behind an `Arc` and caps concurrent calls with
/// its own semaphore.
pub trait ReasoningService: Send + Sync {
    /// Submit a generation request and return the raw response.
    fn generate(
        &self,
        request: &ReasoningRequest,
    ) -> impl Future<Output = Result<ReasoningResponse, TransportError>> + Send;
}

//! # regent-engine — The Analysis Pipeline
//!
//! One public entry point: [`Engine::analyze`] takes a validated
//! [`ProjectProfile`](regent_core::ProjectProfile) through retrieval,
//! context assembly, contract-validated reasoning, scoring, roadmap
//! generation, and audit recording, in that order.
//!
//! ## Pipeline shape
//!
//! ```text
//! retrieve (fan-out, join) → assemble → reason (capped) → score+roadmap → audit
//! ```
//!
//! Retrieval fans out per family and joins before assembly. The
//! reasoning call sits behind a concurrency cap with a bounded
//! admission queue: a full queue fails fast with
//! [`EngineError::EngineOverloaded`] instead of stacking latency.
//!
//! ## Cancellation
//!
//! Dropping the `analyze` future aborts in-flight retrieval tasks and
//! abandons the reasoning call. The audit append is the final step, so
//! a cancelled analysis never leaves a partial audit entry.

pub mod config;
pub mod engine;
pub mod error;

pub use config::{ConfigError, EngineConfig};
pub use engine::{AnalysisOutcome, AuditStatus, Engine};
pub use error::EngineError;

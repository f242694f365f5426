//! # regent-retrieval — Evidence Retrieval & Context Assembly
//!
//! First half of the analysis pipeline: turn a project profile into a
//! bounded, deterministic reasoning context.
//!
//! - **Retriever** ([`retrieve_evidence`]): concurrent per-family
//!   similarity queries against the corpus store with an explicit join
//!   point, then cross-family deduplication on provenance. A family with
//!   zero matches stays in the result as an empty set — "no evidence" is
//!   a finding that must reach the context, never an omission.
//!
//! - **Context Assembler** ([`assemble_context`]): greedy round-robin
//!   selection across families under a byte budget, with
//!   starvation-avoidance (every family with evidence gets a slot before
//!   any family gets a second). Deterministic given identical inputs,
//!   which audit reproducibility requires.

pub mod context;
pub mod retriever;

pub use context::{assemble_context, FamilyCoverage, ReasoningContext};
pub use retriever::{retrieve_evidence, EvidenceSet, RetrievalError};

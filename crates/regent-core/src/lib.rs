//! # regent-core — Foundational Types for the Regent Compliance Engine
//!
//! This crate is the bedrock of the Regent workspace. It defines the
//! type-system primitives every other crate builds on; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed enums for regulatory vocabulary.** `RegulationFamily` and
//!    `Severity` are exhaustive enums. Adding a regime or a severity band
//!    forces every consumer to handle it at compile time.
//!
//! 2. **`CanonicalBytes` newtype.** ALL content-hash computation flows
//!    through `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for
//!    digests. This prevents the canonicalization-split defect class by
//!    construction, which is what makes audit entries reproducible.
//!
//! 3. **No floats in canonical data.** Relevance scores are carried as
//!    basis points (integers); compliance scores are integers. Float
//!    serialization is rejected at the canonicalization boundary.
//!
//! 4. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision.
//!
//! 5. **Validated construction.** `ProjectProfile` cannot exist with an
//!    empty regulation set; the invariant holds through deserialization.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `regent-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement `Serialize`/`Deserialize`.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod family;
pub mod profile;
pub mod severity;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest};
pub use error::{CanonicalizationError, CoreError};
pub use family::{RegulationFamily, REGULATION_FAMILY_COUNT};
pub use profile::{ProjectAttributes, ProjectProfile};
pub use severity::Severity;
pub use temporal::Timestamp;

//! # Canonical Serialization — JCS-Compatible Byte Production
//!
//! Defines `CanonicalBytes`, the sole construction path for bytes used in
//! content-hash computation. Audit idempotency (same analysis inputs →
//! same audit key) depends on every participant hashing the exact same
//! byte sequence, so the serialization path is locked down by type.
//!
//! ## Invariant
//!
//! The inner field is private; the only constructor is
//! `CanonicalBytes::new()`, which rejects floats and then serializes via
//! `serde_jcs` (RFC 8785: sorted keys, compact separators, deterministic
//! number formatting). Any function that computes a digest must accept
//! `&CanonicalBytes`, so no code path can hash non-canonical bytes.
//!
//! ## Float Rejection
//!
//! Relevance scores are carried as basis points and compliance scores as
//! integers precisely so that nothing in an audit hash input ever
//! serializes as a float. A float anywhere in the value tree is a bug in
//! the caller and fails loudly here.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization with float rejection.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - All numbers in the serialized tree are integers.
/// - Object keys are sorted (RFC 8785); separators are compact.
///
/// The inner `Vec<u8>` is private, so downstream code cannot violate
/// these invariants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value tree
    /// contains a float, or `SerializationFailed` if JCS serialization
    /// fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Walk the value tree and reject any number that is not representable
/// as i64/u64. JCS number formatting for floats has edge cases that
/// differ across implementations; integer-only trees sidestep them.
fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(arr) => arr.iter().try_for_each(reject_floats),
    }
}

//! # Error Types — Core Error Hierarchy
//!
//! Errors for the foundational types. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations. Engine-level
//! error taxonomy (retrieval, reasoning, audit, overload) lives in
//! `regent-engine`; this crate only covers construction and
//! canonicalization failures.

use thiserror::Error;

/// Errors from core type construction and validation.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonical serialization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A project profile violated a construction invariant.
    #[error("invalid project profile: {0}")]
    InvalidProfile(String),

    /// A timestamp string was malformed or not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A content digest string was malformed.
    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    /// An unknown regulation family or severity spelling.
    #[error("unknown vocabulary value: {0}")]
    UnknownValue(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Scores and relevance values must be integers (basis points).
    #[error("float values are not permitted in canonical representations; carry scores as integers: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

//! # Content Digest — Audit-Keyed Identifiers
//!
//! `ContentDigest` is the key of the append-only audit log: SHA-256 over
//! the canonical serialization of an analysis's inputs and outputs. Two
//! analyses with identical canonical inputs produce the same digest and
//! therefore land on the same audit entry.
//!
//! ## Invariant
//!
//! [`sha256_digest()`] accepts only `&CanonicalBytes`, never raw bytes,
//! so every digest in the system is computed over the canonicalization
//! pipeline's output.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::CoreError;

/// A SHA-256 content digest, rendered and stored as `sha256:<64 hex>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Wrap a raw 32-byte digest. Prefer [`sha256_digest()`].
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering without the algorithm prefix.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a `sha256:<hex>` string, as produced by `Display`.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let hex = s
            .strip_prefix("sha256:")
            .ok_or_else(|| CoreError::InvalidDigest(format!("missing sha256 prefix: {s:?}")))?;
        if hex.len() != 64 {
            return Err(CoreError::InvalidDigest(format!(
                "expected 64 hex chars, got {}",
                hex.len()
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| CoreError::InvalidDigest("non-UTF8 digest".into()))?;
            bytes[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| CoreError::InvalidDigest(format!("bad hex pair: {pair:?}")))?;
        }
        Ok(Self(bytes))
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

impl std::str::FromStr for ContentDigest {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Serialized as the `sha256:<hex>` string so digests are readable in
// audit rows and stable across languages.
impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(D::Error::custom)
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
///
/// The signature enforces that only `CanonicalBytes` can be hashed,
/// which is what makes audit keys reproducible across processes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_deterministic() {
        let cb = CanonicalBytes::new(&serde_json::json!({"a": 1, "b": 2})).unwrap();
        assert_eq!(sha256_digest(&cb), sha256_digest(&cb));
    }

    #[test]
    fn test_different_inputs_different_digests() {
        let a = CanonicalBytes::new(&serde_json::json!({"a": 1})).unwrap();
        let b = CanonicalBytes::new(&serde_json::json!({"a": 2})).unwrap();
        assert_ne!(sha256_digest(&a), sha256_digest(&b));
    }

    #[test]
    fn test_known_vector_empty_object() {
        // SHA256("{}") — verified against `echo -n '{}' | sha256sum`.
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(
            sha256_digest(&cb).to_hex(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_display_parse_round_trip() {
        let cb = CanonicalBytes::new(&serde_json::json!({"k": "v"})).unwrap();
        let digest = sha256_digest(&cb);
        let s = digest.to_string();
        assert!(s.starts_with("sha256:"));
        assert_eq!(s.len(), 7 + 64);
        assert_eq!(ContentDigest::parse(&s).unwrap(), digest);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ContentDigest::parse("deadbeef").is_err());
        assert!(ContentDigest::parse("sha256:deadbeef").is_err());
        assert!(ContentDigest::parse(&format!("sha256:{}", "zz".repeat(32))).is_err());
    }

    #[test]
    fn test_serde_round_trip_as_string() {
        let cb = CanonicalBytes::new(&serde_json::json!({"k": 1})).unwrap();
        let digest = sha256_digest(&cb);
        let json = serde_json::to_string(&digest).unwrap();
        assert!(json.starts_with("\"sha256:"));
        let back: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
    }
}

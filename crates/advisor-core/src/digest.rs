//! # Content Digests
//!
//! SHA-256 fingerprints of serialized artifacts. The training pipeline
//! records the digest of the model artifact and the codec bundle in the
//! Metadata Record; the artifact store recomputes them on load so a model is
//! never paired with a codec from a different training run.
//!
//! Persisted artifacts are digested over the exact bytes written to disk,
//! via [`ContentDigest::of_bytes`]. [`sha256_digest`] is for in-memory values
//! that are compared but never re-read, such as the boundary snapshot.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A SHA-256 digest rendered as `sha256:<hex>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Digest raw bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let hash = Sha256::digest(bytes);
        let hex: String = hash.iter().map(|b| format!("{b:02x}")).collect();
        Self(format!("sha256:{hex}"))
    }

    /// The full `sha256:<hex>` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The hex part only.
    pub fn to_hex(&self) -> &str {
        self.0.trim_start_matches("sha256:")
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Digest the JSON serialization of a value.
pub fn sha256_digest(value: &impl Serialize) -> Result<ContentDigest, serde_json::Error> {
    let bytes = serde_json::to_vec(value)?;
    Ok(ContentDigest::of_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_matches_known_vector() {
        let d = ContentDigest::of_bytes(b"");
        assert_eq!(
            d.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert!(d.as_str().starts_with("sha256:"));
    }

    #[test]
    fn json_digest_is_deterministic() {
        let v = serde_json::json!({"a": 1, "b": [1, 2, 3]});
        assert_eq!(sha256_digest(&v).unwrap(), sha256_digest(&v).unwrap());
    }

    #[test]
    fn serializes_as_plain_string() {
        let d = ContentDigest::of_bytes(b"x");
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.starts_with("\"sha256:"));
    }
}

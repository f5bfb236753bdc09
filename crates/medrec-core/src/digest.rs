//! # Integrity Digest — Content-Independent Integrity Check
//!
//! Computes a SHA-256 digest over the exact byte payload being anchored.
//! The digest is deliberately independent of the storage network's own
//! content addressing: a record is considered verified only when the bytes
//! resolved through the content address hash back to this digest, which
//! stays meaningful even if the storage network or its gateway is
//! untrusted.
//!
//! ## Invariant
//!
//! `sha256_digest` is pure and deterministic: identical byte sequences
//! always produce identical digests. Later verification and duplicate
//! detection both depend on this.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The hash algorithm used to produce an integrity digest.
///
/// SHA-256 is the only algorithm in use. Records carry an algorithm tag so
/// a future migration does not have to guess how existing digests were
/// produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256 — 256-bit collision-resistant digest.
    Sha256,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An integrity digest with its algorithm tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a digest from raw bytes and algorithm. Prefer
    /// [`sha256_digest()`] for computing digests over payloads.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Compute the SHA-256 integrity digest of a byte payload.
pub fn sha256_digest(data: &[u8]) -> ContentDigest {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

/// Compute the SHA-256 digest of a byte payload as a lowercase hex string.
///
/// Convenience wrapper around [`sha256_digest()`] — this is the form the
/// ledger stores in `integrity_digest`.
pub fn sha256_hex(data: &[u8]) -> String {
    sha256_digest(data).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn digest_deterministic() {
        let d1 = sha256_digest(b"patient record bytes");
        let d2 = sha256_digest(b"patient record bytes");
        assert_eq!(d1, d2);
        assert_eq!(d1.algorithm, DigestAlgorithm::Sha256);
    }

    #[test]
    fn hex_format() {
        let hex = sha256_hex(b"abc");
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn known_sha256_vector() {
        // SHA256("abc") — standard FIPS 180-2 test vector.
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn empty_payload_vector() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn display_carries_algorithm_tag() {
        let digest = sha256_digest(b"x");
        let s = format!("{digest}");
        assert!(s.starts_with("sha256:"));
        assert_eq!(s.len(), 7 + 64);
    }

    proptest! {
        #[test]
        fn prop_deterministic(payload in proptest::collection::vec(any::<u8>(), 1..512)) {
            prop_assert_eq!(sha256_digest(&payload), sha256_digest(&payload));
        }

        #[test]
        fn prop_single_byte_flip_changes_digest(
            payload in proptest::collection::vec(any::<u8>(), 1..512),
            idx in any::<usize>(),
        ) {
            let mut flipped = payload.clone();
            let i = idx % flipped.len();
            flipped[i] ^= 0x01;
            prop_assert_ne!(sha256_digest(&payload), sha256_digest(&flipped));
        }
    }
}

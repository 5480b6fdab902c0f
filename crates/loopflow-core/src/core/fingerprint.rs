// crates/loopflow-core/src/core/fingerprint.rs
// ============================================================================
// Module: Loopflow Canonical Fingerprinting
// Description: RFC 8785 JSON canonicalization and content fingerprint utilities.
// Purpose: Provide deterministic fingerprints for arguments, specs, and documents.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Loopflow fingerprints all canonical JSON using RFC 8785 (JCS) to guarantee
//! stable, replayable digests. Fingerprints of previously validated arguments
//! are stored in the workflow hash record so the processor can detect whether
//! a step already ran with identical inputs. Binary payloads are hashed
//! directly over raw bytes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Hash Algorithm
// ============================================================================

/// Supported hash algorithms for Loopflow fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256 hashing (FIPS-friendly default).
    Sha256,
}

/// Default hash algorithm for Loopflow.
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

// ============================================================================
// SECTION: Fingerprint
// ============================================================================

/// Deterministic content fingerprint representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Hash algorithm identifier.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex-encoded digest bytes.
    pub value: String,
}

impl Fingerprint {
    /// Creates a new fingerprint from raw digest bytes.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, bytes: &[u8]) -> Self {
        Self {
            algorithm,
            value: hex_encode(bytes),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when computing canonical fingerprints.
#[derive(Debug, Error)]
pub enum FingerprintError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Fingerprint Helpers
// ============================================================================

/// Returns canonical JSON bytes for a serializable value using RFC 8785.
///
/// # Errors
///
/// Returns [`FingerprintError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, FingerprintError> {
    serde_jcs::to_vec(value).map_err(|err| FingerprintError::Canonicalization(err.to_string()))
}

/// Fingerprints canonical JSON using the provided algorithm.
///
/// # Errors
///
/// Returns [`FingerprintError::Canonicalization`] when serialization fails.
pub fn fingerprint_canonical_json<T: Serialize + ?Sized>(
    algorithm: HashAlgorithm,
    value: &T,
) -> Result<Fingerprint, FingerprintError> {
    let bytes = canonical_json_bytes(value)?;
    Ok(fingerprint_bytes(algorithm, &bytes))
}

/// Fingerprints raw bytes using the provided algorithm.
#[must_use]
pub fn fingerprint_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> Fingerprint {
    match algorithm {
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update(bytes);
            let digest = hasher.finalize();
            Fingerprint::new(HashAlgorithm::Sha256, &digest)
        }
    }
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

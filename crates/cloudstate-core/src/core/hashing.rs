// crates/cloudstate-core/src/core/hashing.rs
// ============================================================================
// Module: Cloud Account State Digests
// Description: Canonical SHA-256 digests of state records.
// Purpose: Let audit events identify record contents without carrying them.
// Dependencies: serde_jcs, sha2
// ============================================================================

//! ## Overview
//! A [`StateDigest`] is the SHA-256 of a record's RFC 8785 (JCS) canonical
//! JSON form, so two records with the same fields hash the same regardless of
//! insertion order. Digests are lowercase hex.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fmt::Write as _;

use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

use crate::core::record::StateRecord;

// ============================================================================
// SECTION: State Digest
// ============================================================================

/// Hex SHA-256 digest of a canonicalized state record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StateDigest(String);

impl StateDigest {
    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the digest and returns the hex string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalization failure.
#[derive(Debug, Error)]
#[error("failed to canonicalize state record: {0}")]
pub struct HashError(String);

/// Returns the RFC 8785 canonical bytes of a record.
///
/// # Errors
///
/// Returns [`HashError`] when the record cannot be canonicalized, such as
/// when it holds a number JCS cannot represent.
pub fn canonical_state_bytes(record: &StateRecord) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(record).map_err(|err| HashError(err.to_string()))
}

/// Digests a record over its canonical form.
///
/// # Errors
///
/// Returns [`HashError`] when canonicalization fails.
pub fn digest_state(record: &StateRecord) -> Result<StateDigest, HashError> {
    let bytes = canonical_state_bytes(record)?;
    Ok(StateDigest(hex_encode(&Sha256::digest(&bytes))))
}

/// Encodes bytes as lowercase hex.
pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

// crates/cloudstate-core/src/core/fingerprint.rs
// ============================================================================
// Module: Feature Fingerprint
// Description: Order-independent SHA-256 digest over a set of names.
// Purpose: Derive stable identifiers from unordered feature collections.
// Dependencies: serde, sha2
// ============================================================================

//! ## Overview
//! The fingerprint is a change-detection token, not a secret. Names are
//! normalized into a set ordered by byte-wise lexicographic order, then each
//! name is hashed as an 8-byte big-endian length prefix followed by its bytes.
//! The prefix keeps `["ab", "c"]` and `["a", "bc"]` apart.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::core::hashing::hex_encode;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Length of a fingerprint in hex characters.
pub const FINGERPRINT_HEX_LENGTH: usize = 64;

// ============================================================================
// SECTION: Fingerprint
// ============================================================================

/// Lowercase hex SHA-256 fingerprint of a feature-name set.
///
/// # Invariants
/// - Exactly [`FINGERPRINT_HEX_LENGTH`] lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFingerprint(String);

impl FeatureFingerprint {
    /// Returns the fingerprint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when `value` has the shape of a fingerprint.
    #[must_use]
    pub fn is_well_formed(value: &str) -> bool {
        value.len() == FINGERPRINT_HEX_LENGTH
            && value.bytes().all(|byte| matches!(byte, b'0' ..= b'9' | b'a' ..= b'f'))
    }
}

impl fmt::Display for FeatureFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<FeatureFingerprint> for String {
    fn from(value: FeatureFingerprint) -> Self {
        value.0
    }
}

/// Computes the fingerprint of a collection of names.
///
/// Duplicates collapse and iteration order is irrelevant.
#[must_use]
pub fn fingerprint_features<I, S>(names: I) -> FeatureFingerprint
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let collected: Vec<S> = names.into_iter().collect();
    let sorted: BTreeSet<&str> = collected.iter().map(AsRef::as_ref).collect();
    let mut hasher = Sha256::new();
    for name in sorted {
        hasher.update((name.len() as u64).to_be_bytes());
        hasher.update(name.as_bytes());
    }
    FeatureFingerprint(hex_encode(&hasher.finalize()))
}

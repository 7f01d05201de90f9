// crates/cloudstate-core/src/core/features.rs
// ============================================================================
// Module: Account Features
// Description: Feature names, status maps, and fingerprinted snapshots.
// Purpose: Model the enabled-feature set reported by the account service.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The account service reports enabled features as a map from feature name to
//! status. A [`FeatureSnapshot`] pairs that map with its fingerprint, which is
//! recomputed on every read and never persisted on its own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::fingerprint::FeatureFingerprint;
use crate::core::fingerprint::fingerprint_features;
use crate::core::identifiers::AccountId;

// ============================================================================
// SECTION: Feature Names
// ============================================================================

/// Cloud-native protection feature.
pub const CLOUD_NATIVE_PROTECTION: &str = "CLOUD_NATIVE_PROTECTION";
/// Exocompute feature.
pub const EXOCOMPUTE: &str = "EXOCOMPUTE";
/// RDS protection feature.
pub const RDS_PROTECTION: &str = "RDS_PROTECTION";
/// Cloud-native archival feature.
pub const CLOUD_NATIVE_ARCHIVAL: &str = "CLOUD_NATIVE_ARCHIVAL";

/// Enabled features keyed by feature name, valued by status.
pub type FeatureStatusMap = BTreeMap<String, String>;

// ============================================================================
// SECTION: Feature Snapshot
// ============================================================================

/// Enabled features of an account at read time.
///
/// # Invariants
/// - `fingerprint` is always derived from the keys of `features`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    /// Account the features belong to.
    pub account_id: AccountId,
    /// Feature statuses keyed by name.
    pub features: FeatureStatusMap,
    /// Fingerprint over the feature names.
    pub fingerprint: FeatureFingerprint,
}

impl FeatureSnapshot {
    /// Builds a snapshot and computes its fingerprint.
    #[must_use]
    pub fn from_statuses(account_id: AccountId, features: FeatureStatusMap) -> Self {
        let fingerprint = fingerprint_features(features.keys());
        Self {
            account_id,
            features,
            fingerprint,
        }
    }

    /// Returns the status of a feature when enabled.
    #[must_use]
    pub fn status(&self, feature: &str) -> Option<&str> {
        self.features.get(feature).map(String::as_str)
    }
}

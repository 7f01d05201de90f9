// crates/cloudstate-core/tests/fingerprint.rs
// ============================================================================
// Module: Feature Fingerprint Tests
// Description: Order invariance and distinctness of feature fingerprints.
// Purpose: Ensure fingerprints are stable change-detection tokens.
// ============================================================================

//! ## Overview
//! Validates the fingerprint format, order and duplicate invariance, and that
//! concatenation-equivalent sets still produce distinct digests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use cloudstate_core::EXOCOMPUTE;
use cloudstate_core::FINGERPRINT_HEX_LENGTH;
use cloudstate_core::FeatureFingerprint;
use cloudstate_core::FeatureSnapshot;
use cloudstate_core::RDS_PROTECTION;
use cloudstate_core::fingerprint_features;
use proptest::prelude::*;

use crate::common::account_id;
use crate::common::features;

/// Tests the reversed set matches and a subset differs.
#[test]
fn feature_order_does_not_matter() {
    let forward = fingerprint_features([EXOCOMPUTE, RDS_PROTECTION]);
    let reversed = fingerprint_features([RDS_PROTECTION, EXOCOMPUTE]);
    let subset = fingerprint_features([EXOCOMPUTE]);
    assert_eq!(forward, reversed);
    assert_ne!(forward, subset);
}

/// Tests fingerprints match pinned digests so stored ids stay valid.
#[test]
fn fingerprint_matches_known_digests() {
    assert_eq!(
        fingerprint_features([EXOCOMPUTE, RDS_PROTECTION]).as_str(),
        "cbccb49748135037ef456ad1dd455eb668b75d0d137ff694cb911cf22176e459"
    );
    assert_eq!(
        fingerprint_features([EXOCOMPUTE]).as_str(),
        "5da812a48b7ecaceb543980487984ec5068ecdf60259d245349c85a1255aab35"
    );
    let empty: [&str; 0] = [];
    assert_eq!(
        fingerprint_features(empty).as_str(),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

/// Tests fingerprints are 64 lowercase hex characters.
#[test]
fn fingerprint_is_lowercase_hex() {
    let fingerprint = fingerprint_features([EXOCOMPUTE]);
    assert_eq!(fingerprint.as_str().len(), FINGERPRINT_HEX_LENGTH);
    assert!(FeatureFingerprint::is_well_formed(fingerprint.as_str()));
}

/// Tests names that concatenate identically still fingerprint differently.
#[test]
fn concatenation_ambiguity_is_avoided() {
    assert_ne!(fingerprint_features(["ab", "c"]), fingerprint_features(["a", "bc"]));
}

/// Tests duplicates collapse.
#[test]
fn duplicates_collapse() {
    assert_eq!(
        fingerprint_features([EXOCOMPUTE, EXOCOMPUTE, RDS_PROTECTION]),
        fingerprint_features([RDS_PROTECTION, EXOCOMPUTE])
    );
}

/// Tests the empty set has a stable fingerprint distinct from the empty name.
#[test]
fn empty_set_is_distinct_from_empty_name() {
    let empty: [&str; 0] = [];
    assert_eq!(fingerprint_features(empty), fingerprint_features(Vec::<String>::new()));
    assert_ne!(fingerprint_features(empty), fingerprint_features([""]));
}

/// Tests well-formedness rejects uppercase and short strings.
#[test]
fn well_formed_rejects_wrong_shapes() {
    let upper = fingerprint_features([EXOCOMPUTE]).as_str().to_uppercase();
    assert!(!FeatureFingerprint::is_well_formed(&upper));
    assert!(!FeatureFingerprint::is_well_formed("abc"));
}

/// Tests snapshots fingerprint the keys of their status map.
#[test]
fn snapshot_fingerprints_feature_names() {
    let snapshot = FeatureSnapshot::from_statuses(
        account_id(),
        features(&[(RDS_PROTECTION, "CONNECTED"), (EXOCOMPUTE, "DISABLED")]),
    );
    assert_eq!(snapshot.fingerprint, fingerprint_features([EXOCOMPUTE, RDS_PROTECTION]));
    assert_eq!(snapshot.status(EXOCOMPUTE), Some("DISABLED"));
    assert_eq!(snapshot.status("UNKNOWN"), None);
}

proptest! {
    #[test]
    fn permutation_invariant(names in prop::collection::vec("[A-Z_]{0,12}", 0..8)) {
        let mut reversed = names.clone();
        reversed.reverse();
        let mut sorted = names.clone();
        sorted.sort();
        let expected = fingerprint_features(&names);
        prop_assert_eq!(&fingerprint_features(&reversed), &expected);
        prop_assert_eq!(&fingerprint_features(&sorted), &expected);
    }

    #[test]
    fn adding_a_new_name_changes_fingerprint(
        names in prop::collection::btree_set("[A-Z_]{1,12}", 0..6),
        extra in "[a-z]{1,12}",
    ) {
        let before = fingerprint_features(&names);
        let mut grown = names.clone();
        grown.insert(extra);
        prop_assert_ne!(fingerprint_features(&grown), before);
    }
}

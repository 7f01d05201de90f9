// crates/cloudstate-core/tests/identifiers.rs
// ============================================================================
// Module: Identifier Codec Tests
// Description: Encoding, decoding, and rejection of composite identifiers.
// Purpose: Ensure every encoded identifier decodes to its exact components.
// ============================================================================

//! ## Overview
//! Exercises the composite identifier codec with fixed scenarios, rejection
//! cases, serde round-trips, and property tests over separator-heavy keys.

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

use cloudstate_core::AccountId;
use cloudstate_core::CompositeId;
use cloudstate_core::IdentifierError;
use cloudstate_core::decode_identifier;
use cloudstate_core::encode_identifier;
use proptest::prelude::*;
use uuid::Uuid;

use crate::common::ACCOUNT;
use crate::common::account_id;

// ============================================================================
// SECTION: Scenarios
// ============================================================================

/// Tests the role-ARN key survives a round trip unchanged.
#[test]
fn arn_key_round_trips() {
    let encoded = encode_identifier("arn:aws:iam::role/Example", account_id()).unwrap();
    assert_eq!(encoded, format!("arn:aws:iam::role/Example:{ACCOUNT}"));

    let decoded = decode_identifier(&encoded).unwrap();
    assert_eq!(decoded.key(), "arn:aws:iam::role/Example");
    assert_eq!(decoded.account_id(), account_id());
}

/// Tests a string without a separator is rejected.
#[test]
fn decode_rejects_missing_separator() {
    let err = decode_identifier("not-a-valid-identifier").unwrap_err();
    assert!(matches!(err, IdentifierError::Malformed(_)));
}

/// Tests a non-UUID account segment is rejected.
#[test]
fn decode_rejects_non_uuid_suffix() {
    let err = decode_identifier("role:not-a-uuid").unwrap_err();
    assert!(matches!(err, IdentifierError::Malformed(_)));
}

/// Tests uppercase and braced UUIDs are not accepted as canonical.
#[test]
fn decode_rejects_non_canonical_uuid() {
    let upper = format!("role:{}", ACCOUNT.to_uppercase());
    assert!(matches!(decode_identifier(&upper), Err(IdentifierError::Malformed(_))));

    let simple = format!("role:{}", ACCOUNT.replace('-', ""));
    assert!(matches!(decode_identifier(&simple), Err(IdentifierError::Malformed(_))));
}

/// Tests an empty key segment is rejected on decode.
#[test]
fn decode_rejects_empty_key() {
    let err = decode_identifier(&format!(":{ACCOUNT}")).unwrap_err();
    assert!(matches!(err, IdentifierError::Malformed(_)));
}

/// Tests a NUL in the key segment is rejected on decode.
#[test]
fn decode_rejects_nul_key() {
    let err = decode_identifier(&format!("ro\0le:{ACCOUNT}")).unwrap_err();
    assert!(matches!(err, IdentifierError::Malformed(_)));
}

/// Tests empty and NUL keys are rejected on encode.
#[test]
fn encode_rejects_unrepresentable_keys() {
    assert_eq!(encode_identifier("", account_id()), Err(IdentifierError::EmptyKey));
    assert!(matches!(
        encode_identifier("bad\0key", account_id()),
        Err(IdentifierError::InvalidKey(_))
    ));
}

/// Tests a key ending in the separator still splits on the last one.
#[test]
fn key_with_trailing_separator_round_trips() {
    let encoded = encode_identifier("scope:", account_id()).unwrap();
    let decoded = decode_identifier(&encoded).unwrap();
    assert_eq!(decoded.key(), "scope:");
}

// ============================================================================
// SECTION: Conversions
// ============================================================================

/// Tests composite identifiers serialize as plain strings.
#[test]
fn composite_id_serde_uses_encoded_string() {
    let id = CompositeId::new("role", account_id()).unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"role:{ACCOUNT}\""));

    let back: CompositeId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

/// Tests serde rejects malformed identifiers.
#[test]
fn composite_id_serde_rejects_malformed() {
    let result: Result<CompositeId, _> = serde_json::from_str("\"no-separator\"");
    assert!(result.is_err());
}

/// Tests account identifiers parse through `FromStr` and render canonically.
#[test]
fn account_id_from_str_round_trips() {
    let parsed: AccountId = ACCOUNT.parse().unwrap();
    assert_eq!(parsed.to_string(), ACCOUNT);
    assert_eq!(parsed.as_uuid(), Uuid::parse_str(ACCOUNT).unwrap());
}

/// Tests `into_parts` returns the original components.
#[test]
fn composite_id_into_parts() {
    let (key, account) = CompositeId::new("k", account_id()).unwrap().into_parts();
    assert_eq!(key, "k");
    assert_eq!(account, account_id());
}

// ============================================================================
// SECTION: Properties
// ============================================================================

proptest! {
    #[test]
    fn round_trip_for_separator_heavy_keys(
        key in "[:a-z/\\-]{1,24}",
        bytes in any::<[u8; 16]>(),
    ) {
        let account = AccountId::new(Uuid::from_bytes(bytes));
        let encoded = encode_identifier(&key, account).unwrap();
        let decoded = decode_identifier(&encoded).unwrap();
        prop_assert_eq!(decoded.key(), key.as_str());
        prop_assert_eq!(decoded.account_id(), account);
    }

    #[test]
    fn round_trip_for_arbitrary_keys(
        key in "[^\u{0}]{1,48}",
        bytes in any::<[u8; 16]>(),
    ) {
        let account = AccountId::new(Uuid::from_bytes(bytes));
        let id = CompositeId::new(key.clone(), account).unwrap();
        let decoded: CompositeId = id.to_string().parse().unwrap();
        prop_assert_eq!(decoded, id);
    }

    #[test]
    fn decode_never_panics(raw in ".{0,96}") {
        let _ = decode_identifier(&raw);
    }
}

// crates/cloudstate-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for bounded reads and runtime wiring helpers.
// Purpose: Ensure oversized inputs fail closed and config selects services.
// Dependencies: cloudstate-cli main helpers
// ============================================================================

//! ## Overview
//! Validates `read_bytes_with_limit`, argument parsing helpers, and the
//! construction of account services and audit sinks from config.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use cloudstate_config::AuditSinkKind;
use cloudstate_config::CloudStateConfig;
use cloudstate_core::AccountId;
use cloudstate_core::AccountServiceError;
use cloudstate_core::ResourceKind;

use super::ReadLimitError;
use super::build_account_service;
use super::build_audit_sink;
use super::parse_account;
use super::parse_resource_kind;
use super::read_bytes_with_limit;
use super::read_error;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Account used in fixture documents.
const ACCOUNT: &str = "123e4567-e89b-12d3-a456-426614174000";

// ============================================================================
// SECTION: Bounded Reads
// ============================================================================

/// Tests files within the limit are read in full.
#[test]
fn read_bytes_within_limit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, b"{}").unwrap();
    assert_eq!(read_bytes_with_limit(&path, 2).unwrap(), b"{}".to_vec());
}

/// Tests oversized files are rejected with their size.
#[test]
fn read_bytes_rejects_oversized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, vec![b'x'; 16]).unwrap();
    let err = read_bytes_with_limit(&path, 8).unwrap_err();
    assert!(matches!(
        err,
        ReadLimitError::TooLarge {
            size: 16,
            limit: 8
        }
    ));
    assert!(read_error("state file", &path, &err).contains("limit is 8"));
}

/// Tests missing files surface as I/O errors.
#[test]
fn read_bytes_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_bytes_with_limit(&dir.path().join("absent"), 8).unwrap_err();
    assert!(matches!(err, ReadLimitError::Io(_)));
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Tests resource kind labels parse and unknown labels fail.
#[test]
fn resource_kind_labels_parse() {
    assert_eq!(parse_resource_kind("gcp_project"), Ok(ResourceKind::GcpProject));
    assert!(parse_resource_kind("gcp-project").is_err());
}

/// Tests account arguments require canonical UUIDs.
#[test]
fn account_arguments_are_canonical() {
    assert_eq!(parse_account(ACCOUNT).unwrap(), AccountId::parse(ACCOUNT).unwrap());
    assert!(parse_account(&ACCOUNT.to_uppercase()).is_err());
}

// ============================================================================
// SECTION: Runtime Wiring
// ============================================================================

/// Tests the default config yields a service that fails every lookup.
#[test]
fn default_config_uses_unavailable_service() {
    let service = build_account_service(&CloudStateConfig::default()).unwrap();
    let err = service.enabled_features(AccountId::parse(ACCOUNT).unwrap()).unwrap_err();
    assert!(matches!(err, AccountServiceError::Transport(_)));
}

/// Tests configured fixtures back the service.
#[test]
fn fixtures_back_the_service() {
    let dir = tempfile::tempdir().unwrap();
    let fixtures = dir.path().join("accounts.json");
    fs::write(
        &fixtures,
        format!(
            r#"{{"accounts":[{{"id":"{ACCOUNT}","cloud":"aws","name":"prod","native_id":"1","features":{{"EXOCOMPUTE":"CONNECTED"}}}}]}}"#
        ),
    )
    .unwrap();
    let mut config = CloudStateConfig::default();
    config.service.fixtures = Some(fixtures.to_string_lossy().into_owned());

    let service = build_account_service(&config).unwrap();
    let features = service.enabled_features(AccountId::parse(ACCOUNT).unwrap()).unwrap();
    assert_eq!(features.get("EXOCOMPUTE").map(String::as_str), Some("CONNECTED"));

    config.limits.max_fixture_bytes = 4;
    let err = build_account_service(&config).err().unwrap();
    assert!(err.to_string().contains("fixture file"));
}

/// Tests the file sink is created at the configured path.
#[test]
fn file_audit_sink_opens_configured_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let mut config = CloudStateConfig::default();
    config.audit.sink = AuditSinkKind::File;
    config.audit.path = Some(path.to_string_lossy().into_owned());

    let _sink = build_audit_sink(&config).unwrap();
    assert!(path.exists());

    config.audit.path = None;
    assert!(build_audit_sink(&config).is_err());
}

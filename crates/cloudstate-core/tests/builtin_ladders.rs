// crates/cloudstate-core/tests/builtin_ladders.rs
// ============================================================================
// Module: Built-in Ladder Tests
// Description: Walks each released resource ladder from version 0.
// Purpose: Ensure historical state upgrades to the current schema.
// ============================================================================

//! ## Overview
//! Upgrades v0 records of every resource kind with fixture services, then
//! checks the lookup failures each step can hit.

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

use cloudstate_core::AccountService;
use cloudstate_core::AccountServiceError;
use cloudstate_core::CLOUD_NATIVE_PROTECTION;
use cloudstate_core::CloudProvider;
use cloudstate_core::EXOCOMPUTE;
use cloudstate_core::IdentifierError;
use cloudstate_core::LadderRegistry;
use cloudstate_core::MigrationError;
use cloudstate_core::RDS_PROTECTION;
use cloudstate_core::RecordError;
use cloudstate_core::ResourceKind;
use cloudstate_core::SchemaVersion;
use cloudstate_core::StateRecord;
use cloudstate_core::StaticAccountService;
use cloudstate_core::StepError;
use cloudstate_core::UnavailableAccountService;
use serde_json::json;

use crate::common::ACCOUNT;
use crate::common::OTHER_ACCOUNT;
use crate::common::account_id;
use crate::common::aws_service;
use crate::common::details;
use crate::common::record;
use crate::common::service_with;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Upgrades a v0 record of `kind` to current.
fn upgrade(
    kind: ResourceKind,
    state: StateRecord,
    service: &dyn AccountService,
) -> Result<StateRecord, MigrationError> {
    let registry = LadderRegistry::builtin().unwrap();
    registry.get(kind).unwrap().upgrade(state, SchemaVersion::INITIAL, service)
}

/// Extracts the step error from a migration error.
fn step_error(err: MigrationError) -> StepError {
    match err {
        MigrationError::StepFailure {
            source,
            ..
        } => source,
        other => panic!("expected step failure, got {other:?}"),
    }
}

/// Returns a GCP service whose details carry the project number.
fn gcp_service(native_number: Option<&str>, organization: Option<&str>) -> StaticAccountService {
    let mut project = details(CloudProvider::Gcp, "analytics", "analytics-prod");
    project.native_number = native_number.map(ToString::to_string);
    project.organization_name = organization.map(ToString::to_string);
    service_with(project, &[])
}

// ============================================================================
// SECTION: AWS Account
// ============================================================================

/// Tests the account ladder keeps explicit retention and other fields.
#[test]
fn aws_account_upgrades_to_current() {
    let service = aws_service(&[(CLOUD_NATIVE_PROTECTION, "CONNECTED"), (EXOCOMPUTE, "CONNECTED")]);
    let output = upgrade(
        ResourceKind::AwsAccount,
        record(json!({"id": ACCOUNT, "name": "prod", "delete_snapshots_on_destroy": true})),
        &service,
    )
    .unwrap();
    assert_eq!(
        output,
        record(json!({
            "id": ACCOUNT,
            "name": "prod",
            "delete_snapshots_on_destroy": true,
            "cloud_native_protection": [{"status": "CONNECTED", "permission_groups": []}]
        }))
    );
}

/// Tests a disabled protection feature fails the nesting step.
#[test]
fn aws_account_requires_protection_feature() {
    let service = aws_service(&[(EXOCOMPUTE, "CONNECTED")]);
    let err = upgrade(ResourceKind::AwsAccount, record(json!({"id": ACCOUNT})), &service)
        .unwrap_err();
    assert_eq!(
        step_error(err),
        StepError::MissingFeature {
            feature: CLOUD_NATIVE_PROTECTION.to_string(),
            account_id: account_id(),
        }
    );
}

/// Tests an unknown account surfaces the service error.
#[test]
fn aws_account_unknown_account_is_not_found() {
    let service = StaticAccountService::new();
    let err = upgrade(ResourceKind::AwsAccount, record(json!({"id": ACCOUNT})), &service)
        .unwrap_err();
    assert!(!err.is_retryable());
    assert!(matches!(step_error(err), StepError::Service(AccountServiceError::NotFound(_))));
}

/// Tests a malformed account identifier is a record error.
#[test]
fn aws_account_rejects_bad_identifier() {
    let err = upgrade(
        ResourceKind::AwsAccount,
        record(json!({"id": "123"})),
        &UnavailableAccountService,
    )
    .unwrap_err();
    assert!(matches!(step_error(err), StepError::Record(RecordError::InvalidValue { .. })));
}

// ============================================================================
// SECTION: AWS Trust Policy
// ============================================================================

/// Tests the composite identifier falls back to the legacy id.
#[test]
fn trust_policy_encodes_role_and_account() {
    let output = upgrade(
        ResourceKind::AwsTrustPolicy,
        record(json!({"id": ACCOUNT, "role_key": "arn:aws:iam::role/Example"})),
        &UnavailableAccountService,
    )
    .unwrap();
    assert_eq!(
        output,
        record(json!({
            "id": format!("arn:aws:iam::role/Example:{ACCOUNT}"),
            "account_id": ACCOUNT,
            "role_key": "arn:aws:iam::role/Example"
        }))
    );
}

/// Tests an explicit account id that disagrees with the legacy id fails.
#[test]
fn trust_policy_rejects_conflicting_accounts() {
    let err = upgrade(
        ResourceKind::AwsTrustPolicy,
        record(json!({"id": ACCOUNT, "account_id": OTHER_ACCOUNT, "role_key": "role"})),
        &UnavailableAccountService,
    )
    .unwrap_err();
    assert!(matches!(step_error(err), StepError::Invalid(_)));
}

/// Tests an explicit account id is used when the legacy id is not a UUID.
#[test]
fn trust_policy_prefers_explicit_account() {
    let output = upgrade(
        ResourceKind::AwsTrustPolicy,
        record(json!({"id": "legacy", "account_id": ACCOUNT, "role_key": "role"})),
        &UnavailableAccountService,
    )
    .unwrap();
    assert_eq!(output.get("id"), Some(&json!(format!("role:{ACCOUNT}"))));
}

/// Tests missing and empty role keys fail.
#[test]
fn trust_policy_requires_role_key() {
    let missing = upgrade(
        ResourceKind::AwsTrustPolicy,
        record(json!({"id": ACCOUNT})),
        &UnavailableAccountService,
    )
    .unwrap_err();
    assert_eq!(
        step_error(missing),
        StepError::Record(RecordError::MissingField("role_key".to_string()))
    );

    let empty = upgrade(
        ResourceKind::AwsTrustPolicy,
        record(json!({"id": ACCOUNT, "role_key": ""})),
        &UnavailableAccountService,
    )
    .unwrap_err();
    assert_eq!(step_error(empty), StepError::Identifier(IdentifierError::EmptyKey));
}

// ============================================================================
// SECTION: Azure Subscription
// ============================================================================

/// Tests regions and resource group move into the block and the name is backfilled.
#[test]
fn azure_subscription_upgrades_to_current() {
    let service = service_with(
        details(CloudProvider::Azure, "Contoso Production", "sub-1"),
        &[(CLOUD_NATIVE_PROTECTION, "CONNECTED")],
    );
    let output = upgrade(
        ResourceKind::AzureSubscription,
        record(json!({
            "id": ACCOUNT,
            "subscription_id": "sub-1",
            "tenant_domain": "contoso.onmicrosoft.com",
            "regions": ["eastus"],
            "resource_group_name": "rg-backup",
            "resource_group_region": "eastus"
        })),
        &service,
    )
    .unwrap();
    assert_eq!(
        output,
        record(json!({
            "id": ACCOUNT,
            "subscription_id": "sub-1",
            "subscription_name": "Contoso Production",
            "tenant_domain": "contoso.onmicrosoft.com",
            "cloud_native_protection": [{
                "status": "CONNECTED",
                "regions": ["eastus"],
                "resource_group_name": "rg-backup",
                "resource_group_region": "eastus"
            }]
        }))
    );
}

/// Tests a stored subscription name is kept without a details lookup.
#[test]
fn azure_subscription_keeps_existing_name() {
    let service = StaticAccountService::new().with_account(
        details(CloudProvider::Aws, "ignored", "x"),
        common::features(&[(CLOUD_NATIVE_PROTECTION, "DISCONNECTED")]),
    );
    let output = upgrade(
        ResourceKind::AzureSubscription,
        record(json!({
            "id": ACCOUNT,
            "subscription_id": "sub-1",
            "subscription_name": "Stored",
            "tenant_domain": "contoso.onmicrosoft.com"
        })),
        &service,
    )
    .unwrap();
    assert_eq!(output.get("subscription_name"), Some(&json!("Stored")));
    assert_eq!(
        output.get("cloud_native_protection"),
        Some(&json!([{"status": "DISCONNECTED"}]))
    );
}

/// Tests backfilling from a non-Azure account fails.
#[test]
fn azure_subscription_rejects_wrong_cloud() {
    let service = aws_service(&[(CLOUD_NATIVE_PROTECTION, "CONNECTED")]);
    let err = upgrade(
        ResourceKind::AzureSubscription,
        record(json!({"id": ACCOUNT, "subscription_id": "s", "tenant_domain": "t"})),
        &service,
    )
    .unwrap_err();
    assert!(matches!(step_error(err), StepError::Invalid(_)));
}

// ============================================================================
// SECTION: GCP Project
// ============================================================================

/// Tests project details are backfilled and the project field renamed.
#[test]
fn gcp_project_upgrades_to_current() {
    let service = gcp_service(Some("123456789"), Some("Example Org"));
    let output = upgrade(
        ResourceKind::GcpProject,
        record(json!({"id": ACCOUNT, "project": "analytics-prod"})),
        &service,
    )
    .unwrap();
    assert_eq!(
        output,
        record(json!({
            "id": ACCOUNT,
            "project_id": "analytics-prod",
            "project_number": "123456789",
            "organization_name": "Example Org",
            "delete_snapshots_on_destroy": false
        }))
    );
}

/// Tests an absent organization is left unset.
#[test]
fn gcp_project_without_organization() {
    let service = gcp_service(Some("42"), None);
    let output = upgrade(
        ResourceKind::GcpProject,
        record(json!({"id": ACCOUNT, "project": "analytics-prod"})),
        &service,
    )
    .unwrap();
    assert!(!output.contains("organization_name"));
}

/// Tests missing project numbers fail the backfill.
#[test]
fn gcp_project_requires_project_number() {
    let service = gcp_service(None, None);
    let err = upgrade(
        ResourceKind::GcpProject,
        record(json!({"id": ACCOUNT, "project": "analytics-prod"})),
        &service,
    )
    .unwrap_err();
    assert!(matches!(step_error(err), StepError::Invalid(_)));
}

/// Tests details for another project are refused.
#[test]
fn gcp_project_rejects_mismatched_project() {
    let service = gcp_service(Some("42"), None);
    let err = upgrade(
        ResourceKind::GcpProject,
        record(json!({"id": ACCOUNT, "project": "someone-else"})),
        &service,
    )
    .unwrap_err();
    assert!(matches!(step_error(err), StepError::Invalid(_)));
}

/// Tests a v1 project only needs the rename step.
#[test]
fn gcp_project_from_v1_skips_lookup() {
    let registry = LadderRegistry::builtin().unwrap();
    let output = registry
        .get(ResourceKind::GcpProject)
        .unwrap()
        .upgrade(
            record(json!({"id": ACCOUNT, "project": "p", "project_number": "1"})),
            SchemaVersion::new(1),
            &UnavailableAccountService,
        )
        .unwrap();
    assert_eq!(output.get("project_id"), Some(&json!("p")));
}

// ============================================================================
// SECTION: Feature Set
// ============================================================================

/// Tests the feature set is re-keyed by its fingerprint.
#[test]
fn feature_set_upgrades_to_current() {
    let output = upgrade(
        ResourceKind::FeatureSet,
        record(json!({"id": ACCOUNT, "features": [RDS_PROTECTION, EXOCOMPUTE, RDS_PROTECTION]})),
        &UnavailableAccountService,
    )
    .unwrap();
    assert_eq!(
        output,
        record(json!({
            "id": "cbccb49748135037ef456ad1dd455eb668b75d0d137ff694cb911cf22176e459",
            "account_id": ACCOUNT,
            "features": [EXOCOMPUTE, RDS_PROTECTION]
        }))
    );
}

/// Tests a feature set without features fails.
#[test]
fn feature_set_requires_features() {
    let err = upgrade(
        ResourceKind::FeatureSet,
        record(json!({"id": ACCOUNT})),
        &UnavailableAccountService,
    )
    .unwrap_err();
    assert_eq!(
        step_error(err),
        StepError::Record(RecordError::MissingField("features".to_string()))
    );
}

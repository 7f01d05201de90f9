// crates/cloudstate-core/src/resources/azure_subscription.rs
// ============================================================================
// Module: Azure Subscription Ladder
// Description: Schema history of onboarded Azure subscriptions.
// Purpose: Nest cloud-native protection settings under a feature block.
// Dependencies: crate::{core, interfaces, runtime}, serde_json
// ============================================================================

//! ## Overview
//! - v0: `id`, `subscription_id`, `tenant_domain`, with regions and the
//!   resource group at top level.
//! - v1: regions and resource group move into a `cloud_native_protection`
//!   block carrying the live feature status; `subscription_name` is
//!   backfilled from the account details when missing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;

use super::FIELD_ID;
use super::FIELD_REGIONS;
use super::FIELD_STATUS;
use crate::core::features::CLOUD_NATIVE_PROTECTION;
use crate::core::record::StateRecord;
use crate::core::resource::ResourceKind;
use crate::core::schema::FieldShape;
use crate::core::schema::FieldSpec;
use crate::interfaces::CloudProvider;
use crate::runtime::ladder::LadderError;
use crate::runtime::ladder::SchemaLadder;
use crate::runtime::ladder::StepContext;
use crate::runtime::ladder::StepError;
use crate::runtime::ladder::UpgradeStep;

// ============================================================================
// SECTION: Fields
// ============================================================================

/// Native Azure subscription identifier.
pub const FIELD_SUBSCRIPTION_ID: &str = "subscription_id";
/// Display name of the subscription.
pub const FIELD_SUBSCRIPTION_NAME: &str = "subscription_name";
/// Azure AD tenant domain.
pub const FIELD_TENANT_DOMAIN: &str = "tenant_domain";
/// Resource group holding protection artifacts.
pub const FIELD_RESOURCE_GROUP_NAME: &str = "resource_group_name";
/// Region of the resource group.
pub const FIELD_RESOURCE_GROUP_REGION: &str = "resource_group_region";
/// Nested cloud-native protection block.
pub const FIELD_CLOUD_NATIVE_PROTECTION: &str = "cloud_native_protection";

/// Fields of version 1.
const V1_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(FIELD_ID, FieldShape::AccountId),
    FieldSpec::required(FIELD_SUBSCRIPTION_ID, FieldShape::String),
    FieldSpec::required(FIELD_SUBSCRIPTION_NAME, FieldShape::String),
    FieldSpec::required(FIELD_TENANT_DOMAIN, FieldShape::String),
    FieldSpec::required(FIELD_CLOUD_NATIVE_PROTECTION, FieldShape::Block),
];

/// Top-level v0 fields that move into the protection block.
const NESTED_STRING_FIELDS: [&str; 2] = [FIELD_RESOURCE_GROUP_NAME, FIELD_RESOURCE_GROUP_REGION];

// ============================================================================
// SECTION: Ladder
// ============================================================================

/// Builds the Azure subscription ladder.
///
/// # Errors
///
/// Returns [`LadderError`] when the steps are mis-assembled.
pub fn ladder() -> Result<SchemaLadder, LadderError> {
    SchemaLadder::new(
        ResourceKind::AzureSubscription,
        vec![UpgradeStep::new(0, "nest_cloud_native_protection", nest_cloud_native_protection, V1_FIELDS)],
    )
}

// ============================================================================
// SECTION: Steps
// ============================================================================

/// v0 -> v1: builds the protection block and backfills the subscription name.
fn nest_cloud_native_protection(
    mut record: StateRecord,
    ctx: &StepContext<'_>,
) -> Result<StateRecord, StepError> {
    let account_id = record.require_account_id(FIELD_ID)?;
    record.require_str(FIELD_SUBSCRIPTION_ID)?;
    record.require_str(FIELD_TENANT_DOMAIN)?;

    let mut block = Map::new();
    let status = ctx.required_feature_status(account_id, CLOUD_NATIVE_PROTECTION)?;
    block.insert(FIELD_STATUS.to_string(), Value::String(status));
    if let Some(regions) = record.optional_string_list(FIELD_REGIONS)? {
        block.insert(FIELD_REGIONS.to_string(), Value::from(regions));
    }
    for field in NESTED_STRING_FIELDS {
        if let Some(value) = record.optional_str(field)? {
            block.insert(field.to_string(), Value::String(value.to_string()));
        }
    }

    if record.optional_str(FIELD_SUBSCRIPTION_NAME)?.is_none() {
        let details = ctx.account_details(account_id)?;
        if details.cloud != CloudProvider::Azure {
            return Err(StepError::Invalid(format!(
                "account {account_id} is not an azure subscription"
            )));
        }
        record.insert(FIELD_SUBSCRIPTION_NAME, details.name);
    }

    record.remove(FIELD_REGIONS);
    for field in NESTED_STRING_FIELDS {
        record.remove(field);
    }
    record.set_block(FIELD_CLOUD_NATIVE_PROTECTION, block)?;
    Ok(record)
}

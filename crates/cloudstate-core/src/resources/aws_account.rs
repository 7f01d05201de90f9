// crates/cloudstate-core/src/resources/aws_account.rs
// ============================================================================
// Module: AWS Account Ladder
// Description: Schema history of onboarded AWS accounts.
// Purpose: Nest cloud-native protection state and default retention flags.
// Dependencies: crate::{core, runtime}, serde_json
// ============================================================================

//! ## Overview
//! - v0: `id`, optional `name`, optional top-level `regions`.
//! - v1: regions move into a `cloud_native_protection` block whose `status`
//!   is backfilled from the live feature lookup.
//! - v2: `delete_snapshots_on_destroy` defaults to `false` and the protection
//!   block gains an empty `permission_groups` list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;

use super::FIELD_DELETE_SNAPSHOTS_ON_DESTROY;
use super::FIELD_ID;
use super::FIELD_REGIONS;
use super::FIELD_STATUS;
use crate::core::features::CLOUD_NATIVE_PROTECTION;
use crate::core::record::StateRecord;
use crate::core::resource::ResourceKind;
use crate::core::schema::FieldShape;
use crate::core::schema::FieldSpec;
use crate::runtime::ladder::LadderError;
use crate::runtime::ladder::SchemaLadder;
use crate::runtime::ladder::StepContext;
use crate::runtime::ladder::StepError;
use crate::runtime::ladder::UpgradeStep;

// ============================================================================
// SECTION: Fields
// ============================================================================

/// Nested cloud-native protection block.
pub const FIELD_CLOUD_NATIVE_PROTECTION: &str = "cloud_native_protection";
/// Permission groups inside the protection block.
pub const FIELD_PERMISSION_GROUPS: &str = "permission_groups";

/// Fields of version 1.
const V1_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(FIELD_ID, FieldShape::AccountId),
    FieldSpec::optional("name", FieldShape::String),
    FieldSpec::required(FIELD_CLOUD_NATIVE_PROTECTION, FieldShape::Block),
    FieldSpec::optional(FIELD_DELETE_SNAPSHOTS_ON_DESTROY, FieldShape::Bool),
];

/// Fields of version 2.
const V2_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(FIELD_ID, FieldShape::AccountId),
    FieldSpec::optional("name", FieldShape::String),
    FieldSpec::required(FIELD_CLOUD_NATIVE_PROTECTION, FieldShape::Block),
    FieldSpec::required(FIELD_DELETE_SNAPSHOTS_ON_DESTROY, FieldShape::Bool),
];

// ============================================================================
// SECTION: Ladder
// ============================================================================

/// Builds the AWS account ladder.
///
/// # Errors
///
/// Returns [`LadderError`] when the steps are mis-assembled.
pub fn ladder() -> Result<SchemaLadder, LadderError> {
    SchemaLadder::new(
        ResourceKind::AwsAccount,
        vec![
            UpgradeStep::new(0, "nest_cloud_native_protection", nest_cloud_native_protection, V1_FIELDS),
            UpgradeStep::new(1, "default_snapshot_retention", default_snapshot_retention, V2_FIELDS),
        ],
    )
}

// ============================================================================
// SECTION: Steps
// ============================================================================

/// v0 -> v1: moves regions into a protection block with the live status.
fn nest_cloud_native_protection(
    mut record: StateRecord,
    ctx: &StepContext<'_>,
) -> Result<StateRecord, StepError> {
    let account_id = record.require_account_id(FIELD_ID)?;
    let regions = record.optional_string_list(FIELD_REGIONS)?;
    let status = ctx.required_feature_status(account_id, CLOUD_NATIVE_PROTECTION)?;

    let mut block = Map::new();
    block.insert(FIELD_STATUS.to_string(), Value::String(status));
    if let Some(regions) = regions {
        block.insert(FIELD_REGIONS.to_string(), Value::from(regions));
    }
    record.remove(FIELD_REGIONS);
    record.set_block(FIELD_CLOUD_NATIVE_PROTECTION, block)?;
    Ok(record)
}

/// v1 -> v2: fills in retention and permission group defaults.
fn default_snapshot_retention(
    mut record: StateRecord,
    _ctx: &StepContext<'_>,
) -> Result<StateRecord, StepError> {
    if record.optional_bool(FIELD_DELETE_SNAPSHOTS_ON_DESTROY)?.is_none() {
        record.insert(FIELD_DELETE_SNAPSHOTS_ON_DESTROY, false);
    }
    let block = record.block_mut(FIELD_CLOUD_NATIVE_PROTECTION)?;
    if block.get(FIELD_PERMISSION_GROUPS).is_none_or(Value::is_null) {
        block.insert(FIELD_PERMISSION_GROUPS.to_string(), Value::Array(Vec::new()));
    }
    Ok(record)
}

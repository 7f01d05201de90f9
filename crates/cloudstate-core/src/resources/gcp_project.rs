// crates/cloudstate-core/src/resources/gcp_project.rs
// ============================================================================
// Module: GCP Project Ladder
// Description: Schema history of onboarded GCP projects.
// Purpose: Backfill project details and settle the project field name.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! - v0: `id` and the native `project` identifier.
//! - v1: `project_number` and, when known, `organization_name` are copied from
//!   the account details.
//! - v2: `project` is renamed to `project_id` and
//!   `delete_snapshots_on_destroy` defaults to `false`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::FIELD_DELETE_SNAPSHOTS_ON_DESTROY;
use super::FIELD_ID;
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

/// Native project identifier before v2.
pub const FIELD_PROJECT: &str = "project";
/// Native project identifier from v2.
pub const FIELD_PROJECT_ID: &str = "project_id";
/// Native project number.
pub const FIELD_PROJECT_NUMBER: &str = "project_number";
/// Owning organization name.
pub const FIELD_ORGANIZATION_NAME: &str = "organization_name";

/// Fields of version 1.
const V1_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(FIELD_ID, FieldShape::AccountId),
    FieldSpec::required(FIELD_PROJECT, FieldShape::String),
    FieldSpec::required(FIELD_PROJECT_NUMBER, FieldShape::String),
    FieldSpec::optional(FIELD_ORGANIZATION_NAME, FieldShape::String),
    FieldSpec::optional(FIELD_DELETE_SNAPSHOTS_ON_DESTROY, FieldShape::Bool),
];

/// Fields of version 2.
const V2_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(FIELD_ID, FieldShape::AccountId),
    FieldSpec::required(FIELD_PROJECT_ID, FieldShape::String),
    FieldSpec::required(FIELD_PROJECT_NUMBER, FieldShape::String),
    FieldSpec::optional(FIELD_ORGANIZATION_NAME, FieldShape::String),
    FieldSpec::required(FIELD_DELETE_SNAPSHOTS_ON_DESTROY, FieldShape::Bool),
];

// ============================================================================
// SECTION: Ladder
// ============================================================================

/// Builds the GCP project ladder.
///
/// # Errors
///
/// Returns [`LadderError`] when the steps are mis-assembled.
pub fn ladder() -> Result<SchemaLadder, LadderError> {
    SchemaLadder::new(
        ResourceKind::GcpProject,
        vec![
            UpgradeStep::new(0, "backfill_project_details", backfill_project_details, V1_FIELDS),
            UpgradeStep::new(1, "rename_project_id", rename_project_id, V2_FIELDS),
        ],
    )
}

// ============================================================================
// SECTION: Steps
// ============================================================================

/// v0 -> v1: copies the project number and organization from live details.
fn backfill_project_details(
    mut record: StateRecord,
    ctx: &StepContext<'_>,
) -> Result<StateRecord, StepError> {
    let account_id = record.require_account_id(FIELD_ID)?;
    let project = record.require_str(FIELD_PROJECT)?;
    let details = ctx.account_details(account_id)?;
    if details.cloud != CloudProvider::Gcp {
        return Err(StepError::Invalid(format!("account {account_id} is not a gcp project")));
    }
    if details.native_id != project {
        return Err(StepError::Invalid(format!(
            "account {account_id} does not match the stored project"
        )));
    }
    let project_number = details.native_number.ok_or_else(|| {
        StepError::Invalid(format!("account {account_id} has no project number"))
    })?;
    record.insert(FIELD_PROJECT_NUMBER, project_number);
    if let Some(organization_name) = details.organization_name {
        record.insert(FIELD_ORGANIZATION_NAME, organization_name);
    }
    Ok(record)
}

/// v1 -> v2: renames the project field and defaults snapshot retention.
fn rename_project_id(
    mut record: StateRecord,
    _ctx: &StepContext<'_>,
) -> Result<StateRecord, StepError> {
    record.rename(FIELD_PROJECT, FIELD_PROJECT_ID)?;
    if record.optional_bool(FIELD_DELETE_SNAPSHOTS_ON_DESTROY)?.is_none() {
        record.insert(FIELD_DELETE_SNAPSHOTS_ON_DESTROY, false);
    }
    Ok(record)
}

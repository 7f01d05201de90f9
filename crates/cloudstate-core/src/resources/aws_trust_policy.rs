// crates/cloudstate-core/src/resources/aws_trust_policy.rs
// ============================================================================
// Module: AWS Trust Policy Ladder
// Description: Schema history of AWS cross-account trust policies.
// Purpose: Re-key trust policies by role key and account.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! - v0: `id` holds the account UUID, `role_key` names the role, and
//!   `account_id` may repeat the account.
//! - v1: `id` is the composite identifier `<role_key>:<account>` and
//!   `account_id` is always written.

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::FIELD_ID;
use crate::core::identifiers::CompositeId;
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

/// Account the trust policy belongs to.
pub const FIELD_ACCOUNT_ID: &str = "account_id";
/// Role key the policy grants.
pub const FIELD_ROLE_KEY: &str = "role_key";

/// Fields of version 1.
const V1_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(FIELD_ID, FieldShape::CompositeId),
    FieldSpec::required(FIELD_ACCOUNT_ID, FieldShape::AccountId),
    FieldSpec::required(FIELD_ROLE_KEY, FieldShape::String),
];

// ============================================================================
// SECTION: Ladder
// ============================================================================

/// Builds the AWS trust policy ladder.
///
/// # Errors
///
/// Returns [`LadderError`] when the steps are mis-assembled.
pub fn ladder() -> Result<SchemaLadder, LadderError> {
    SchemaLadder::new(
        ResourceKind::AwsTrustPolicy,
        vec![UpgradeStep::new(0, "composite_identifier", composite_identifier, V1_FIELDS)],
    )
}

// ============================================================================
// SECTION: Steps
// ============================================================================

/// v0 -> v1: encodes the role key and account into `id`.
fn composite_identifier(
    mut record: StateRecord,
    _ctx: &StepContext<'_>,
) -> Result<StateRecord, StepError> {
    let role_key = record.require_str(FIELD_ROLE_KEY)?.to_string();
    let account_id = if record.contains(FIELD_ACCOUNT_ID) {
        let account_id = record.require_account_id(FIELD_ACCOUNT_ID)?;
        if let Ok(legacy) = record.require_account_id(FIELD_ID)
            && legacy != account_id
        {
            return Err(StepError::Invalid(format!(
                "`{FIELD_ID}` and `{FIELD_ACCOUNT_ID}` name different accounts"
            )));
        }
        account_id
    } else {
        record.require_account_id(FIELD_ID)?
    };
    let id = CompositeId::new(role_key, account_id)?;
    record.insert(FIELD_ID, id.to_string());
    record.insert(FIELD_ACCOUNT_ID, account_id.to_string());
    Ok(record)
}

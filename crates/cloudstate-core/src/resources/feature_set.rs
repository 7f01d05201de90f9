// crates/cloudstate-core/src/resources/feature_set.rs
// ============================================================================
// Module: Feature Set Ladder
// Description: Schema history of the per-account enabled-feature data source.
// Purpose: Identify feature sets by their fingerprint.
// Dependencies: crate::{core, runtime}, serde_json
// ============================================================================

//! ## Overview
//! - v0: `id` holds the account UUID and `features` the enabled names.
//! - v1: `id` is the feature fingerprint, the account moves to `account_id`,
//!   and `features` is stored sorted without duplicates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde_json::Value;

use super::FIELD_ID;
use crate::core::fingerprint::fingerprint_features;
use crate::core::record::RecordError;
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

/// Account the feature set was read for.
pub const FIELD_ACCOUNT_ID: &str = "account_id";
/// Enabled feature names.
pub const FIELD_FEATURES: &str = "features";

/// Fields of version 1.
const V1_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(FIELD_ID, FieldShape::Fingerprint),
    FieldSpec::required(FIELD_ACCOUNT_ID, FieldShape::AccountId),
    FieldSpec::required(FIELD_FEATURES, FieldShape::StringList),
];

// ============================================================================
// SECTION: Ladder
// ============================================================================

/// Builds the feature set ladder.
///
/// # Errors
///
/// Returns [`LadderError`] when the steps are mis-assembled.
pub fn ladder() -> Result<SchemaLadder, LadderError> {
    SchemaLadder::new(
        ResourceKind::FeatureSet,
        vec![UpgradeStep::new(0, "fingerprint_identifier", fingerprint_identifier, V1_FIELDS)],
    )
}

// ============================================================================
// SECTION: Steps
// ============================================================================

/// v0 -> v1: replaces the account identifier with the feature fingerprint.
fn fingerprint_identifier(
    mut record: StateRecord,
    _ctx: &StepContext<'_>,
) -> Result<StateRecord, StepError> {
    let account_id = record.require_account_id(FIELD_ID)?;
    let features: BTreeSet<String> = record
        .optional_string_list(FIELD_FEATURES)?
        .ok_or_else(|| RecordError::MissingField(FIELD_FEATURES.to_string()))?
        .into_iter()
        .collect();
    let fingerprint = fingerprint_features(&features);
    record.insert(FIELD_ID, String::from(fingerprint));
    record.insert(FIELD_ACCOUNT_ID, account_id.to_string());
    record.insert(FIELD_FEATURES, Value::from(features.into_iter().collect::<Vec<_>>()));
    Ok(record)
}

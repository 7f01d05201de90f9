// crates/cloudstate-core/src/resources/mod.rs
// ============================================================================
// Module: Built-in Resource Ladders
// Description: Released schema ladders for every versioned resource kind.
// Purpose: Assemble the shipped upgrade steps into validated ladders.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! Each submodule owns one resource kind: its field names, the field
//! declarations of every released version, and the steps between them.
//! Released steps are frozen; a schema change adds a new step at the top of
//! the ladder.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod aws_account;
pub mod aws_trust_policy;
pub mod azure_subscription;
pub mod feature_set;
pub mod gcp_project;

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::runtime::ladder::LadderError;
use crate::runtime::ladder::SchemaLadder;

// ============================================================================
// SECTION: Assembly
// ============================================================================

/// Field holding the resource identifier in every resource kind.
pub const FIELD_ID: &str = "id";
/// Field holding the snapshot-retention flag.
pub const FIELD_DELETE_SNAPSHOTS_ON_DESTROY: &str = "delete_snapshots_on_destroy";
/// Field holding a list of regions.
pub const FIELD_REGIONS: &str = "regions";
/// Field holding a feature status inside a feature block.
pub const FIELD_STATUS: &str = "status";

/// Builds every built-in ladder.
///
/// # Errors
///
/// Returns [`LadderError`] when a ladder is mis-assembled.
pub fn builtin_ladders() -> Result<Vec<SchemaLadder>, LadderError> {
    Ok(vec![
        aws_account::ladder()?,
        aws_trust_policy::ladder()?,
        azure_subscription::ladder()?,
        feature_set::ladder()?,
        gcp_project::ladder()?,
    ])
}

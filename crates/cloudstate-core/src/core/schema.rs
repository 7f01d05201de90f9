// crates/cloudstate-core/src/core/schema.rs
// ============================================================================
// Module: State Schemas
// Description: Schema versions and per-version field shape declarations.
// Purpose: Assert record shape at every upgrade step boundary.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Each upgrade step declares the fields its output version must carry. The
//! ladder checks those declarations after every step so a malformed record is
//! reported as a typed [`RecordError`] rather than discovered later.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::fingerprint::FeatureFingerprint;
use crate::core::identifiers::AccountId;
use crate::core::identifiers::CompositeId;
use crate::core::record::RecordError;
use crate::core::record::StateRecord;

// ============================================================================
// SECTION: Schema Version
// ============================================================================

/// Schema version tag of a persisted state record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaVersion(u32);

impl SchemaVersion {
    /// The first schema version of every resource.
    pub const INITIAL: Self = Self(0);

    /// Creates a schema version.
    #[must_use]
    pub const fn new(version: u32) -> Self {
        Self(version)
    }

    /// Returns the raw version number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the following version, or `None` on overflow.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SchemaVersion {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Field Shapes
// ============================================================================

/// Expected JSON shape of a state record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldShape {
    /// JSON string.
    String,
    /// JSON boolean.
    Bool,
    /// JSON array of strings.
    StringList,
    /// Canonical account UUID string.
    AccountId,
    /// Composite `<key>:<uuid>` identifier string.
    CompositeId,
    /// Feature fingerprint string.
    Fingerprint,
    /// Array holding exactly one JSON object (nested block).
    Block,
}

impl FieldShape {
    /// Returns a stable label for the shape.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::StringList => "string_list",
            Self::AccountId => "account_id",
            Self::CompositeId => "composite_id",
            Self::Fingerprint => "fingerprint",
            Self::Block => "block",
        }
    }

    /// Returns true when `value` matches the shape.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Bool => value.is_boolean(),
            Self::StringList => {
                value.as_array().is_some_and(|items| items.iter().all(Value::is_string))
            }
            Self::AccountId => value.as_str().is_some_and(|text| AccountId::parse(text).is_ok()),
            Self::CompositeId => {
                value.as_str().is_some_and(|text| CompositeId::parse(text).is_ok())
            }
            Self::Fingerprint => value.as_str().is_some_and(FeatureFingerprint::is_well_formed),
            Self::Block => value
                .as_array()
                .is_some_and(|items| items.len() == 1 && items.iter().all(Value::is_object)),
        }
    }
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field declaration for one schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name.
    pub name: &'static str,
    /// Expected shape.
    pub shape: FieldShape,
    /// Whether the field must be present and non-null.
    pub required: bool,
}

impl FieldSpec {
    /// Declares a required field.
    #[must_use]
    pub const fn required(name: &'static str, shape: FieldShape) -> Self {
        Self {
            name,
            shape,
            required: true,
        }
    }

    /// Declares an optional field.
    #[must_use]
    pub const fn optional(name: &'static str, shape: FieldShape) -> Self {
        Self {
            name,
            shape,
            required: false,
        }
    }
}

/// Validates a record against field declarations.
///
/// Optional fields may be absent or null; when present they must match.
///
/// # Errors
///
/// Returns [`RecordError::MissingField`] or [`RecordError::WrongShape`] for the
/// first declaration the record violates.
pub fn validate_fields(record: &StateRecord, fields: &[FieldSpec]) -> Result<(), RecordError> {
    for spec in fields {
        match record.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    return Err(RecordError::MissingField(spec.name.to_string()));
                }
            }
            Some(value) => {
                if !spec.shape.matches(value) {
                    return Err(RecordError::WrongShape {
                        field: spec.name.to_string(),
                        expected: spec.shape,
                    });
                }
            }
        }
    }
    Ok(())
}

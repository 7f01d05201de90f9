// crates/cloudstate-core/src/core/record.rs
// ============================================================================
// Module: Persisted State Records
// Description: Validated field mapping for persisted resource state.
// Purpose: Give upgrade steps typed access to untyped persisted state.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`StateRecord`] is the durable state of one resource instance: a JSON
//! object keyed by field name. Accessors check the shape of every field they
//! read and report violations as [`RecordError`], so upgrade steps never
//! perform unchecked type assertions. A null field is treated as absent.
//!
//! Nested blocks follow the declarative-configuration convention of a list
//! holding exactly one object.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::identifiers::AccountId;
use crate::core::schema::FieldShape;
use crate::core::schema::SchemaVersion;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// State record access errors.
///
/// # Invariants
/// - Messages name fields but never embed field values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The state payload is not a JSON object.
    #[error("state record must be a json object")]
    NotAnObject,
    /// A required field is absent or null.
    #[error("state record is missing field `{0}`")]
    MissingField(String),
    /// A field has the wrong JSON shape.
    #[error("state record field `{field}` must be a {expected}")]
    WrongShape {
        /// Field name.
        field: String,
        /// Expected shape.
        expected: FieldShape,
    },
    /// A field has the right shape but an invalid value.
    #[error("state record field `{field}` is invalid: {reason}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Validation failure reason.
        reason: String,
    },
    /// A field would overwrite an existing value.
    #[error("state record field `{0}` already exists")]
    FieldConflict(String),
}

// ============================================================================
// SECTION: State Record
// ============================================================================

/// Persisted state of one resource instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateRecord(Map<String, Value>);

impl StateRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wraps a JSON object map.
    #[must_use]
    pub const fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Converts a JSON value into a record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotAnObject`] when `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(RecordError::NotAnObject),
        }
    }

    /// Returns the record as a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Returns the underlying field map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the raw value of a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns true when the field is present and not null.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.get(field).is_some_and(|value| !value.is_null())
    }

    /// Sets a field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Removes a field, returning its value when present and not null.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field).filter(|value| !value.is_null())
    }

    /// Moves a field to a new name.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingField`] when `from` is absent and
    /// [`RecordError::FieldConflict`] when `to` already holds a value.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), RecordError> {
        if self.contains(to) {
            return Err(RecordError::FieldConflict(to.to_string()));
        }
        let value = self.remove(from).ok_or_else(|| RecordError::MissingField(from.to_string()))?;
        self.0.insert(to.to_string(), value);
        Ok(())
    }

    /// Returns a required string field.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] when the field is absent or not a string.
    pub fn require_str(&self, field: &str) -> Result<&str, RecordError> {
        self.optional_str(field)?.ok_or_else(|| RecordError::MissingField(field.to_string()))
    }

    /// Returns an optional string field.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::WrongShape`] when the field is present but not a
    /// string.
    pub fn optional_str(&self, field: &str) -> Result<Option<&str>, RecordError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text)),
            Some(_) => Err(wrong_shape(field, FieldShape::String)),
        }
    }

    /// Returns an optional boolean field.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::WrongShape`] when the field is present but not a
    /// boolean.
    pub fn optional_bool(&self, field: &str) -> Result<Option<bool>, RecordError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(*flag)),
            Some(_) => Err(wrong_shape(field, FieldShape::Bool)),
        }
    }

    /// Returns a required account identifier field.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] when the field is absent, not a string, or not a
    /// canonical account UUID.
    pub fn require_account_id(&self, field: &str) -> Result<AccountId, RecordError> {
        let text = self.require_str(field)?;
        AccountId::parse(text).map_err(|err| RecordError::InvalidValue {
            field: field.to_string(),
            reason: err.to_string(),
        })
    }

    /// Returns an optional list of strings.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::WrongShape`] when the field is present but not an
    /// array of strings.
    pub fn optional_string_list(&self, field: &str) -> Result<Option<Vec<String>>, RecordError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(ToString::to_string)
                        .ok_or_else(|| wrong_shape(field, FieldShape::StringList))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(wrong_shape(field, FieldShape::StringList)),
        }
    }

    /// Returns the object inside a nested block.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] when the field is absent or not a single-object
    /// list.
    pub fn block(&self, field: &str) -> Result<&Map<String, Value>, RecordError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Err(RecordError::MissingField(field.to_string())),
            Some(Value::Array(items)) => match items.as_slice() {
                [Value::Object(inner)] => Ok(inner),
                _ => Err(wrong_shape(field, FieldShape::Block)),
            },
            Some(_) => Err(wrong_shape(field, FieldShape::Block)),
        }
    }

    /// Returns the object inside a nested block for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] when the field is absent or not a single-object
    /// list.
    pub fn block_mut(&mut self, field: &str) -> Result<&mut Map<String, Value>, RecordError> {
        match self.0.get_mut(field) {
            None | Some(Value::Null) => Err(RecordError::MissingField(field.to_string())),
            Some(Value::Array(items)) => match items.as_mut_slice() {
                [Value::Object(inner)] => Ok(inner),
                _ => Err(wrong_shape(field, FieldShape::Block)),
            },
            Some(_) => Err(wrong_shape(field, FieldShape::Block)),
        }
    }

    /// Sets a nested block holding `inner`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::FieldConflict`] when the field already holds a
    /// value.
    pub fn set_block(&mut self, field: &str, inner: Map<String, Value>) -> Result<(), RecordError> {
        if self.contains(field) {
            return Err(RecordError::FieldConflict(field.to_string()));
        }
        self.0.insert(field.to_string(), Value::Array(vec![Value::Object(inner)]));
        Ok(())
    }

    /// Iterates over field names in storage order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<Map<String, Value>> for StateRecord {
    fn from(value: Map<String, Value>) -> Self {
        Self::from_map(value)
    }
}

impl TryFrom<Value> for StateRecord {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

// ============================================================================
// SECTION: Versioned Record
// ============================================================================

/// State record tagged with the schema version it was written under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionedRecord {
    /// Schema version the state conforms to.
    pub schema_version: SchemaVersion,
    /// Persisted state.
    pub state: StateRecord,
}

impl VersionedRecord {
    /// Creates a versioned record.
    #[must_use]
    pub const fn new(schema_version: SchemaVersion, state: StateRecord) -> Self {
        Self {
            schema_version,
            state,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a shape error for `field`.
fn wrong_shape(field: &str, expected: FieldShape) -> RecordError {
    RecordError::WrongShape {
        field: field.to_string(),
        expected,
    }
}

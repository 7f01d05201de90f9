// crates/cloudstate-core/src/core/identifiers.rs
// ============================================================================
// Module: Cloud Account State Identifiers
// Description: Account identifiers and the composite identifier codec.
// Purpose: Encode multiple logical keys into one opaque, lossless string.
// Dependencies: serde, thiserror, uuid
// ============================================================================

//! ## Overview
//! Resource identifiers exposed to the operator are either a bare account UUID
//! or a composite of an opaque key and an account UUID. The composite form is
//! `<key>:<uuid>`. Canonical UUIDs never contain `:`, so the last separator in
//! the string is always the boundary and keys may contain `:` freely.
//!
//! Account identifiers accept only the canonical lowercase hyphenated UUID
//! form. Any accepted string renders back to the exact same bytes, which keeps
//! [`decode_identifier`] the exact inverse of [`encode_identifier`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator between the key and the account UUID in composite identifiers.
pub const IDENTIFIER_SEPARATOR: char = ':';
/// Length of a canonical hyphenated UUID string.
const CANONICAL_UUID_LENGTH: usize = 36;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Identifier construction and parsing errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Messages never echo the rejected identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The key component is empty.
    #[error("identifier key must not be empty")]
    EmptyKey,
    /// The key component contains a forbidden character.
    #[error("identifier key is invalid: {0}")]
    InvalidKey(String),
    /// The identifier string does not match the expected format.
    #[error("malformed identifier: {0}")]
    Malformed(String),
}

// ============================================================================
// SECTION: Account Identifier
// ============================================================================

/// Account identifier assigned by the account-management service.
///
/// # Invariants
/// - String form is always the canonical lowercase 8-4-4-4-12 UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(Uuid);

impl AccountId {
    /// Creates an account identifier from a UUID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Parses a canonical account identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::Malformed`] when the value is not a
    /// canonical lowercase hyphenated UUID.
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        if value.len() != CANONICAL_UUID_LENGTH {
            return Err(IdentifierError::Malformed(
                "account id must be a 36 character uuid".to_string(),
            ));
        }
        let uuid = Uuid::parse_str(value)
            .map_err(|_| IdentifierError::Malformed("account id is not a valid uuid".to_string()))?;
        let canonical = uuid.hyphenated().to_string();
        if canonical != value {
            return Err(IdentifierError::Malformed(
                "account id must use canonical lowercase form".to_string(),
            ));
        }
        Ok(Self(uuid))
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for AccountId {
    type Err = IdentifierError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl From<Uuid> for AccountId {
    fn from(value: Uuid) -> Self {
        Self::new(value)
    }
}

impl TryFrom<String> for AccountId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.to_string()
    }
}

// ============================================================================
// SECTION: Composite Identifier
// ============================================================================

/// Composite identifier joining an opaque key with an account identifier.
///
/// # Invariants
/// - `key` is non-empty and contains no NUL characters.
/// - `to_string()` followed by `parse()` yields an equal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompositeId {
    /// Opaque key component (role key, artifact key, ...).
    key: String,
    /// Account component.
    account_id: AccountId,
}

impl CompositeId {
    /// Creates a composite identifier after validating the key.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::EmptyKey`] or [`IdentifierError::InvalidKey`]
    /// when the key cannot be encoded.
    pub fn new(key: impl Into<String>, account_id: AccountId) -> Result<Self, IdentifierError> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self {
            key,
            account_id,
        })
    }

    /// Parses an encoded composite identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::Malformed`] when the value was not produced
    /// by the encoder.
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        let Some((key, account)) = value.rsplit_once(IDENTIFIER_SEPARATOR) else {
            return Err(IdentifierError::Malformed("missing account separator".to_string()));
        };
        if key.is_empty() {
            return Err(IdentifierError::Malformed("key segment is empty".to_string()));
        }
        if key.contains('\0') {
            return Err(IdentifierError::Malformed("key segment contains nul".to_string()));
        }
        let account_id = AccountId::parse(account)?;
        Ok(Self {
            key: key.to_string(),
            account_id,
        })
    }

    /// Returns the key component.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the account component.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Splits the identifier into its components.
    #[must_use]
    pub fn into_parts(self) -> (String, AccountId) {
        (self.key, self.account_id)
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{IDENTIFIER_SEPARATOR}{}", self.key, self.account_id)
    }
}

impl FromStr for CompositeId {
    type Err = IdentifierError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for CompositeId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CompositeId> for String {
    fn from(value: CompositeId) -> Self {
        value.to_string()
    }
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Encodes a key and account identifier into a composite identifier string.
///
/// # Errors
///
/// Returns [`IdentifierError::EmptyKey`] for an empty key and
/// [`IdentifierError::InvalidKey`] for a key containing NUL.
pub fn encode_identifier(key: &str, account_id: AccountId) -> Result<String, IdentifierError> {
    CompositeId::new(key, account_id).map(|id| id.to_string())
}

/// Decodes a composite identifier string into its components.
///
/// # Errors
///
/// Returns [`IdentifierError::Malformed`] when the separator is missing, the
/// key segment is empty, or the account segment is not a canonical UUID.
pub fn decode_identifier(value: &str) -> Result<CompositeId, IdentifierError> {
    CompositeId::parse(value)
}

/// Rejects keys the decoder could not reproduce.
fn validate_key(key: &str) -> Result<(), IdentifierError> {
    if key.is_empty() {
        return Err(IdentifierError::EmptyKey);
    }
    if key.contains('\0') {
        return Err(IdentifierError::InvalidKey("key contains nul".to_string()));
    }
    Ok(())
}

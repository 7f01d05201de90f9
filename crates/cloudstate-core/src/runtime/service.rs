// crates/cloudstate-core/src/runtime/service.rs
// ============================================================================
// Module: In-Process Account Services
// Description: Fixture-backed and unavailable AccountService implementations.
// Purpose: Run migrations offline and in tests without a network client.
// Dependencies: crate::{core, interfaces}, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`StaticAccountService`] answers lookups from an in-memory fixture set,
//! typically loaded from a JSON file. [`UnavailableAccountService`] fails every
//! lookup, so steps that need live data fail while pure steps still run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::features::FeatureSnapshot;
use crate::core::features::FeatureStatusMap;
use crate::core::identifiers::AccountId;
use crate::interfaces::AccountDetails;
use crate::interfaces::AccountService;
use crate::interfaces::AccountServiceError;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// One account entry in a fixture file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFixture {
    /// Account details.
    #[serde(flatten)]
    pub details: AccountDetails,
    /// Enabled features keyed by name.
    #[serde(default)]
    pub features: FeatureStatusMap,
}

/// Fixture file payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountFixtureSet {
    /// Account entries.
    #[serde(default)]
    pub accounts: Vec<AccountFixture>,
}

/// Fixture loading errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    /// Fixture JSON could not be parsed.
    #[error("account fixture parse error: {0}")]
    Parse(String),
    /// Two fixture entries share an account identifier.
    #[error("account fixture lists account {0} more than once")]
    DuplicateAccount(AccountId),
}

// ============================================================================
// SECTION: Static Service
// ============================================================================

/// Account service answering from in-memory fixtures.
#[derive(Debug, Clone, Default)]
pub struct StaticAccountService {
    /// Fixtures keyed by account identifier.
    accounts: BTreeMap<AccountId, AccountFixture>,
}

impl StaticAccountService {
    /// Creates an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a service from a fixture set.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::DuplicateAccount`] when an account repeats.
    pub fn from_fixtures(fixtures: AccountFixtureSet) -> Result<Self, FixtureError> {
        let mut service = Self::new();
        for fixture in fixtures.accounts {
            let id = fixture.details.id;
            if service.accounts.insert(id, fixture).is_some() {
                return Err(FixtureError::DuplicateAccount(id));
            }
        }
        Ok(service)
    }

    /// Parses a JSON fixture document.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when parsing fails or an account repeats.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, FixtureError> {
        let fixtures: AccountFixtureSet =
            serde_json::from_slice(bytes).map_err(|err| FixtureError::Parse(err.to_string()))?;
        Self::from_fixtures(fixtures)
    }

    /// Adds or replaces an account.
    #[must_use]
    pub fn with_account(mut self, details: AccountDetails, features: FeatureStatusMap) -> Self {
        self.accounts.insert(
            details.id,
            AccountFixture {
                details,
                features,
            },
        );
        self
    }

    /// Returns the number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true when no accounts are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Looks up a fixture entry.
    fn fixture(&self, account_id: AccountId) -> Result<&AccountFixture, AccountServiceError> {
        self.accounts
            .get(&account_id)
            .ok_or_else(|| AccountServiceError::NotFound(account_id.to_string()))
    }
}

impl AccountService for StaticAccountService {
    fn enabled_features(
        &self,
        account_id: AccountId,
    ) -> Result<FeatureStatusMap, AccountServiceError> {
        Ok(self.fixture(account_id)?.features.clone())
    }

    fn account_details(&self, account_id: AccountId) -> Result<AccountDetails, AccountServiceError> {
        Ok(self.fixture(account_id)?.details.clone())
    }
}

// ============================================================================
// SECTION: Unavailable Service
// ============================================================================

/// Account service that fails every lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableAccountService;

/// Message returned by every [`UnavailableAccountService`] lookup.
const UNAVAILABLE_MESSAGE: &str = "no account service configured";

impl AccountService for UnavailableAccountService {
    fn enabled_features(
        &self,
        _account_id: AccountId,
    ) -> Result<FeatureStatusMap, AccountServiceError> {
        Err(AccountServiceError::Transport(UNAVAILABLE_MESSAGE.to_string()))
    }

    fn account_details(
        &self,
        _account_id: AccountId,
    ) -> Result<AccountDetails, AccountServiceError> {
        Err(AccountServiceError::Transport(UNAVAILABLE_MESSAGE.to_string()))
    }
}

// ============================================================================
// SECTION: Feature Reads
// ============================================================================

/// Reads the enabled features of an account and fingerprints them.
///
/// # Errors
///
/// Returns the service error unchanged when the lookup fails.
pub fn read_feature_snapshot(
    service: &dyn AccountService,
    account_id: AccountId,
) -> Result<FeatureSnapshot, AccountServiceError> {
    let features = service.enabled_features(account_id)?;
    Ok(FeatureSnapshot::from_statuses(account_id, features))
}

// crates/cloudstate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Cloud Account State Interfaces
// Description: Contract for the remote account-management service.
// Purpose: Let upgrade steps enrich state from live data without a network client.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! Upgrade steps that backfill fields from live data call the account service
//! through [`AccountService`]. Calls are blocking; timeouts, cancellation and
//! retries belong to the implementation. Failures are surfaced unchanged by
//! the calling step.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::features::FeatureStatusMap;
use crate::core::identifiers::AccountId;

// ============================================================================
// SECTION: Account Details
// ============================================================================

/// Cloud provider hosting an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudProvider {
    /// Amazon Web Services.
    Aws,
    /// Microsoft Azure.
    Azure,
    /// Google Cloud Platform.
    Gcp,
}

/// Account or project details returned by the account service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetails {
    /// Account identifier assigned by the service.
    pub id: AccountId,
    /// Cloud provider.
    pub cloud: CloudProvider,
    /// Display name.
    pub name: String,
    /// Cloud-native identifier (AWS account id, subscription id, project id).
    pub native_id: String,
    /// Cloud-native numeric identifier, when the provider has one.
    #[serde(default)]
    pub native_number: Option<String>,
    /// Owning organization or tenant name, when known.
    #[serde(default)]
    pub organization_name: Option<String>,
}

// ============================================================================
// SECTION: Account Service
// ============================================================================

/// Account service errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountServiceError {
    /// Transport failure (connection, timeout, unavailable backend).
    #[error("account service transport error: {0}")]
    Transport(String),
    /// The caller is not authorized for the request.
    #[error("account service unauthorized: {0}")]
    Unauthorized(String),
    /// The account does not exist.
    #[error("account not found: {0}")]
    NotFound(String),
}

impl AccountServiceError {
    /// Returns true when the failure may succeed on retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Read-only view of the remote account-management service.
pub trait AccountService: Send + Sync {
    /// Returns the enabled features of an account keyed by name.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError`] when the lookup fails.
    fn enabled_features(&self, account_id: AccountId)
    -> Result<FeatureStatusMap, AccountServiceError>;

    /// Returns the details of an account or project.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError`] when the lookup fails.
    fn account_details(&self, account_id: AccountId) -> Result<AccountDetails, AccountServiceError>;
}

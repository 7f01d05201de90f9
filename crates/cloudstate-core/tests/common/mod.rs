// crates/cloudstate-core/tests/common/mod.rs
// =============================================================================
// Module: Core Test Helpers
// Description: Shared fixtures for cloudstate-core integration tests.
// Purpose: Build accounts, services, records, and capturing audit sinks.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]
#![allow(clippy::unwrap_used, reason = "Fixtures are deterministic.")]

use std::sync::Mutex;

use cloudstate_core::AccountDetails;
use cloudstate_core::AccountId;
use cloudstate_core::CloudProvider;
use cloudstate_core::FeatureStatusMap;
use cloudstate_core::MigrationAuditEvent;
use cloudstate_core::MigrationAuditSink;
use cloudstate_core::StateRecord;
use cloudstate_core::StaticAccountService;
use serde_json::Value;

/// Account identifier used across scenarios.
pub const ACCOUNT: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Second account identifier for mismatch scenarios.
pub const OTHER_ACCOUNT: &str = "00000000-0000-4000-8000-000000000001";

/// Returns the scenario account identifier.
pub fn account_id() -> AccountId {
    AccountId::parse(ACCOUNT).unwrap()
}

/// Returns the secondary account identifier.
pub fn other_account_id() -> AccountId {
    AccountId::parse(OTHER_ACCOUNT).unwrap()
}

/// Builds a feature status map from pairs.
pub fn features(pairs: &[(&str, &str)]) -> FeatureStatusMap {
    pairs.iter().map(|(name, status)| ((*name).to_string(), (*status).to_string())).collect()
}

/// Builds account details with no optional fields.
pub fn details(cloud: CloudProvider, name: &str, native_id: &str) -> AccountDetails {
    AccountDetails {
        id: account_id(),
        cloud,
        name: name.to_string(),
        native_id: native_id.to_string(),
        native_number: None,
        organization_name: None,
    }
}

/// Builds a service holding one account.
pub fn service_with(details: AccountDetails, pairs: &[(&str, &str)]) -> StaticAccountService {
    StaticAccountService::new().with_account(details, features(pairs))
}

/// Builds a service holding one AWS account with the given features.
pub fn aws_service(pairs: &[(&str, &str)]) -> StaticAccountService {
    service_with(details(CloudProvider::Aws, "production", "123456789012"), pairs)
}

/// Converts a JSON literal into a record.
pub fn record(value: Value) -> StateRecord {
    StateRecord::from_value(value).unwrap()
}

/// Audit sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct CapturingAuditSink {
    /// Recorded events in emission order.
    events: Mutex<Vec<MigrationAuditEvent>>,
}

impl CapturingAuditSink {
    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<MigrationAuditEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Returns the recorded event names.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events().iter().map(|event| event.event).collect()
    }
}

impl MigrationAuditSink for CapturingAuditSink {
    fn record(&self, event: &MigrationAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

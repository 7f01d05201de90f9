// crates/cloudstate-core/src/runtime/audit.rs
// ============================================================================
// Module: Migration Audit Logging
// Description: Structured audit events for state migrations.
// Purpose: Emit hash-only migration logs without hard logging dependencies.
// Dependencies: crate::core, serde, serde_json
// ============================================================================

//! ## Overview
//! Every migration run reports its outcome through a [`MigrationAuditSink`].
//! Events carry canonical record digests rather than raw state, so logs never
//! contain account configuration. Sinks are best-effort: a sink that cannot
//! write drops the event, while the migration result is still returned to the
//! caller.
//!
//! Step events report steps that succeeded within a run. The run's outcome is
//! the final `migration_completed` or `migration_failed` event; after a failure
//! no upgraded record exists, including the output of earlier applied steps.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::hashing::StateDigest;
use crate::core::hashing::digest_state;
use crate::core::record::StateRecord;
use crate::core::resource::ResourceKind;
use crate::core::schema::SchemaVersion;
use crate::runtime::ladder::MigrationError;

// ============================================================================
// SECTION: Event Names
// ============================================================================

/// Record already at the current version.
pub const EVENT_MIGRATION_NOOP: &str = "migration_noop";
/// One upgrade step succeeded within a run; the run outcome comes later.
pub const EVENT_STEP_APPLIED: &str = "migration_step_applied";
/// All required steps succeeded.
pub const EVENT_MIGRATION_COMPLETED: &str = "migration_completed";
/// The migration failed.
pub const EVENT_MIGRATION_FAILED: &str = "migration_failed";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Migration audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Resource kind being migrated.
    pub resource: ResourceKind,
    /// Version the event starts from.
    pub from_version: SchemaVersion,
    /// Version the event reached or targeted.
    pub to_version: SchemaVersion,
    /// Step name for step-level events.
    pub step: Option<&'static str>,
    /// Canonical hash of the record before the event.
    pub input_hash: Option<String>,
    /// Canonical hash of the record after the event.
    pub output_hash: Option<String>,
    /// Error kind label for failures.
    pub error_kind: Option<&'static str>,
    /// Error message for failures.
    pub error: Option<String>,
}

impl MigrationAuditEvent {
    /// Builds a no-op event.
    #[must_use]
    pub fn noop(resource: ResourceKind, version: SchemaVersion, record: &StateRecord) -> Self {
        let hash = record_hash(record);
        Self {
            event: EVENT_MIGRATION_NOOP,
            timestamp_ms: now_millis(),
            resource,
            from_version: version,
            to_version: version,
            step: None,
            input_hash: hash.clone(),
            output_hash: hash,
            error_kind: None,
            error: None,
        }
    }

    /// Builds a step-applied event.
    #[must_use]
    pub fn step_applied(
        resource: ResourceKind,
        from_version: SchemaVersion,
        to_version: SchemaVersion,
        step: &'static str,
        input_hash: Option<String>,
        output: &StateRecord,
    ) -> Self {
        Self {
            event: EVENT_STEP_APPLIED,
            timestamp_ms: now_millis(),
            resource,
            from_version,
            to_version,
            step: Some(step),
            input_hash,
            output_hash: record_hash(output),
            error_kind: None,
            error: None,
        }
    }

    /// Builds a completion event.
    #[must_use]
    pub fn completed(
        resource: ResourceKind,
        from_version: SchemaVersion,
        to_version: SchemaVersion,
        input_hash: Option<String>,
        output: &StateRecord,
    ) -> Self {
        Self {
            event: EVENT_MIGRATION_COMPLETED,
            timestamp_ms: now_millis(),
            resource,
            from_version,
            to_version,
            step: None,
            input_hash,
            output_hash: record_hash(output),
            error_kind: None,
            error: None,
        }
    }

    /// Builds a failure event.
    #[must_use]
    pub fn failed(
        resource: ResourceKind,
        from_version: SchemaVersion,
        to_version: SchemaVersion,
        input_hash: Option<String>,
        error: &MigrationError,
    ) -> Self {
        let step = match error {
            MigrationError::StepFailure {
                step,
                ..
            } => Some(*step),
            _ => None,
        };
        Self {
            event: EVENT_MIGRATION_FAILED,
            timestamp_ms: now_millis(),
            resource,
            from_version,
            to_version,
            step,
            input_hash,
            output_hash: None,
            error_kind: Some(error.kind_label()),
            error: Some(error.to_string()),
        }
    }
}

/// Returns the canonical hash of a record, if it can be computed.
#[must_use]
pub fn record_hash(record: &StateRecord) -> Option<String> {
    digest_state(record).ok().map(StateDigest::into_string)
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for migration events.
pub trait MigrationAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &MigrationAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrMigrationAuditSink;

impl MigrationAuditSink for StderrMigrationAuditSink {
    fn record(&self, event: &MigrationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileMigrationAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileMigrationAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl MigrationAuditSink for FileMigrationAuditSink {
    fn record(&self, event: &MigrationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopMigrationAuditSink;

impl MigrationAuditSink for NoopMigrationAuditSink {
    fn record(&self, _event: &MigrationAuditEvent) {}
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns milliseconds since the Unix epoch, or zero if the clock is unset.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |duration| duration.as_millis())
}

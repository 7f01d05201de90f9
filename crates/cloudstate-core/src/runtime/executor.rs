// crates/cloudstate-core/src/runtime/executor.rs
// ============================================================================
// Module: Migration Executor
// Description: Applies the required ladder steps to one stored record.
// Purpose: Single entry point used by the reconciliation layer on read-back.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The executor walks a [`SchemaLadder`] from the stored version to current.
//! A record at current passes through unchanged; a record from a newer schema
//! is rejected; the first failing step ends the run and its error is returned
//! as-is. Each run reports to a [`MigrationAuditSink`], but auditing never
//! replaces returning the error.
//!
//! The executor holds only shared references and keeps no state between runs.
//! Callers must not migrate the same resource from two threads at once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::record::StateRecord;
use crate::core::record::VersionedRecord;
use crate::core::schema::SchemaVersion;
use crate::interfaces::AccountService;
use crate::runtime::audit::MigrationAuditEvent;
use crate::runtime::audit::MigrationAuditSink;
use crate::runtime::audit::record_hash;
use crate::runtime::ladder::MigrationError;
use crate::runtime::ladder::SchemaLadder;

// ============================================================================
// SECTION: Executor
// ============================================================================

/// Runs migrations for one resource kind.
#[derive(Clone, Copy)]
pub struct MigrationExecutor<'a> {
    /// Ladder for the resource kind.
    ladder: &'a SchemaLadder,
    /// Account service for enrichment lookups.
    service: &'a dyn AccountService,
    /// Audit sink for migration events.
    audit: &'a dyn MigrationAuditSink,
}

impl<'a> MigrationExecutor<'a> {
    /// Creates an executor over a ladder.
    #[must_use]
    pub const fn new(
        ladder: &'a SchemaLadder,
        service: &'a dyn AccountService,
        audit: &'a dyn MigrationAuditSink,
    ) -> Self {
        Self {
            ladder,
            service,
            audit,
        }
    }

    /// Returns the ladder the executor walks.
    #[must_use]
    pub const fn ladder(&self) -> &'a SchemaLadder {
        self.ladder
    }

    /// Migrates a record written under `stored_version` to current.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::UnsupportedFutureVersion`] for records newer
    /// than current, [`MigrationError::LadderGap`] for a missing step, and
    /// [`MigrationError::StepFailure`] for the first failing step.
    pub fn run(
        &self,
        stored_version: SchemaVersion,
        record: StateRecord,
    ) -> Result<StateRecord, MigrationError> {
        let resource = self.ladder.resource();
        let current = self.ladder.current_version();
        if stored_version == current {
            self.audit.record(&MigrationAuditEvent::noop(resource, current, &record));
            return Ok(record);
        }
        let input_hash = record_hash(&record);
        match self.walk(stored_version, record, input_hash.clone()) {
            Ok(upgraded) => {
                self.audit.record(&MigrationAuditEvent::completed(
                    resource,
                    stored_version,
                    current,
                    input_hash,
                    &upgraded,
                ));
                Ok(upgraded)
            }
            Err(error) => {
                self.audit.record(&MigrationAuditEvent::failed(
                    resource,
                    stored_version,
                    current,
                    input_hash,
                    &error,
                ));
                Err(error)
            }
        }
    }

    /// Migrates a versioned record and tags the result with current.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError`] under the same conditions as [`Self::run`].
    pub fn run_versioned(&self, record: VersionedRecord) -> Result<VersionedRecord, MigrationError> {
        let state = self.run(record.schema_version, record.state)?;
        Ok(VersionedRecord::new(self.ladder.current_version(), state))
    }

    /// Applies every planned step, emitting one event per step.
    fn walk(
        &self,
        stored_version: SchemaVersion,
        record: StateRecord,
        input_hash: Option<String>,
    ) -> Result<StateRecord, MigrationError> {
        let resource = self.ladder.resource();
        let mut record = record;
        let mut tracked = stored_version;
        let mut last_hash = input_hash;
        for step in self.ladder.plan(stored_version)? {
            record = self.ladder.apply_step(step, tracked, record, self.service)?;
            let next = self.ladder.next_version(tracked)?;
            let event = MigrationAuditEvent::step_applied(
                resource,
                tracked,
                next,
                step.name(),
                last_hash.take(),
                &record,
            );
            last_hash.clone_from(&event.output_hash);
            self.audit.record(&event);
            tracked = next;
        }
        Ok(record)
    }
}

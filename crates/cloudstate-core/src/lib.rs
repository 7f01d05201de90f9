// crates/cloudstate-core/src/lib.rs
// ============================================================================
// Module: Cloud Account State Core Library
// Description: Public API surface for resource identity and state migration.
// Purpose: Expose identifiers, fingerprints, ladders, and the migration executor.
// Dependencies: crate::{core, interfaces, runtime, resources}
// ============================================================================

//! ## Overview
//! Cloud Account State core owns the identity and schema-evolution rules for
//! cloud-account resources reconciled against a remote account-management
//! service. It builds and parses composite identifiers, computes
//! order-independent feature fingerprints, and carries persisted state records
//! forward through every schema version exactly once.
//!
//! The remote service is reached only through the [`AccountService`] trait;
//! nothing in this crate performs network I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod resources;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::AccountDetails;
pub use interfaces::AccountService;
pub use interfaces::AccountServiceError;
pub use interfaces::CloudProvider;
pub use runtime::FileMigrationAuditSink;
pub use runtime::LadderError;
pub use runtime::LadderRegistry;
pub use runtime::MigrationAuditEvent;
pub use runtime::MigrationAuditSink;
pub use runtime::MigrationError;
pub use runtime::MigrationExecutor;
pub use runtime::NoopMigrationAuditSink;
pub use runtime::SchemaLadder;
pub use runtime::StaticAccountService;
pub use runtime::StderrMigrationAuditSink;
pub use runtime::StepContext;
pub use runtime::StepError;
pub use runtime::UnavailableAccountService;
pub use runtime::UpgradeStep;

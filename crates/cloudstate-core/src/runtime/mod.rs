// crates/cloudstate-core/src/runtime/mod.rs
// ============================================================================
// Module: Cloud Account State Runtime
// Description: Ladders, migration executor, registry, audit, and services.
// Purpose: Execute state migrations against the account service interface.
// Dependencies: crate::{core, interfaces, resources}
// ============================================================================

//! ## Overview
//! Runtime modules compose core types into executable migrations. Every entry
//! point (library callers, CLI, tests) goes through the same ladder and
//! executor code.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod executor;
pub mod ladder;
pub mod registry;
pub mod service;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileMigrationAuditSink;
pub use audit::MigrationAuditEvent;
pub use audit::MigrationAuditSink;
pub use audit::NoopMigrationAuditSink;
pub use audit::StderrMigrationAuditSink;
pub use executor::MigrationExecutor;
pub use ladder::LadderError;
pub use ladder::MigrationError;
pub use ladder::SchemaLadder;
pub use ladder::StepContext;
pub use ladder::StepError;
pub use ladder::StepFn;
pub use ladder::UpgradeStep;
pub use registry::LadderRegistry;
pub use service::AccountFixture;
pub use service::AccountFixtureSet;
pub use service::FixtureError;
pub use service::StaticAccountService;
pub use service::UnavailableAccountService;
pub use service::read_feature_snapshot;

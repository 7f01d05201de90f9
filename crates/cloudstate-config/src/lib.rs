// crates/cloudstate-config/src/lib.rs
// ============================================================================
// Module: Cloud Account State Config Library
// Description: Canonical configuration model and validation.
// Purpose: Single source of truth for cloudstate.toml semantics.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! `cloudstate-config` defines the configuration of the offline migration
//! tooling: where audit events go, which account fixtures back the account
//! service, and how large input files may be. Validation is strict and fails
//! closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;

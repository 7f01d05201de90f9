// crates/cloudstate-core/src/runtime/registry.rs
// ============================================================================
// Module: Ladder Registry
// Description: Immutable map from resource kind to schema ladder.
// Purpose: Build every ladder once at startup and hand it out by reference.
// Dependencies: crate::{core, resources, runtime}
// ============================================================================

//! ## Overview
//! The registry replaces a global step table. It is constructed explicitly,
//! never mutated afterwards, and passed by reference to whoever needs a
//! ladder. Tests can build registries holding only the ladders they exercise.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::resource::ResourceKind;
use crate::core::schema::SchemaVersion;
use crate::interfaces::AccountService;
use crate::resources::builtin_ladders;
use crate::runtime::audit::MigrationAuditSink;
use crate::runtime::executor::MigrationExecutor;
use crate::runtime::ladder::LadderError;
use crate::runtime::ladder::SchemaLadder;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Immutable set of ladders keyed by resource kind.
///
/// # Invariants
/// - At most one ladder per resource kind.
#[derive(Debug, Clone, Default)]
pub struct LadderRegistry {
    /// Ladders keyed by resource kind.
    ladders: BTreeMap<ResourceKind, SchemaLadder>,
}

impl LadderRegistry {
    /// Builds a registry from ladders.
    ///
    /// # Errors
    ///
    /// Returns [`LadderError::DuplicateResource`] when two ladders target the
    /// same resource kind.
    pub fn new(ladders: Vec<SchemaLadder>) -> Result<Self, LadderError> {
        let mut map = BTreeMap::new();
        for ladder in ladders {
            let resource = ladder.resource();
            if map.insert(resource, ladder).is_some() {
                return Err(LadderError::DuplicateResource(resource));
            }
        }
        Ok(Self {
            ladders: map,
        })
    }

    /// Builds the registry of all built-in ladders.
    ///
    /// # Errors
    ///
    /// Returns [`LadderError`] when a built-in ladder is mis-assembled.
    pub fn builtin() -> Result<Self, LadderError> {
        Self::new(builtin_ladders()?)
    }

    /// Returns the ladder for a resource kind.
    #[must_use]
    pub fn get(&self, resource: ResourceKind) -> Option<&SchemaLadder> {
        self.ladders.get(&resource)
    }

    /// Returns the current schema version for a resource kind.
    #[must_use]
    pub fn current_version(&self, resource: ResourceKind) -> Option<SchemaVersion> {
        self.get(resource).map(SchemaLadder::current_version)
    }

    /// Returns an executor for a resource kind.
    #[must_use]
    pub fn executor<'a>(
        &'a self,
        resource: ResourceKind,
        service: &'a dyn AccountService,
        audit: &'a dyn MigrationAuditSink,
    ) -> Option<MigrationExecutor<'a>> {
        self.get(resource).map(|ladder| MigrationExecutor::new(ladder, service, audit))
    }

    /// Iterates over ladders in resource label order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaLadder> {
        self.ladders.values()
    }

    /// Returns the number of ladders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ladders.len()
    }

    /// Returns true when the registry holds no ladders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ladders.is_empty()
    }
}

// crates/cloudstate-core/src/runtime/ladder.rs
// ============================================================================
// Module: Schema Version Ladder
// Description: Ordered forward-only upgrade steps for one resource kind.
// Purpose: Carry any historical state record to the current schema version.
// Dependencies: crate::{core, interfaces}, thiserror
// ============================================================================

//! ## Overview
//! A [`SchemaLadder`] holds one [`UpgradeStep`] per historical version. Step
//! *N* turns a version-*N* record into a version-*N+1* record. The ladder is
//! validated when it is built: steps must start at version 0 and be contiguous,
//! so the current version is exactly the number of steps.
//!
//! Steps run strictly in increasing version order. Each step's output is
//! checked against the field declarations of the version it produces. The
//! first failure aborts the walk and no partial record escapes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

use crate::core::features::FeatureStatusMap;
use crate::core::identifiers::AccountId;
use crate::core::identifiers::IdentifierError;
use crate::core::record::RecordError;
use crate::core::record::StateRecord;
use crate::core::resource::ResourceKind;
use crate::core::schema::FieldSpec;
use crate::core::schema::SchemaVersion;
use crate::core::schema::validate_fields;
use crate::interfaces::AccountDetails;
use crate::interfaces::AccountService;
use crate::interfaces::AccountServiceError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure raised by a single upgrade step.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    /// Input or output record violated its field declarations.
    #[error(transparent)]
    Record(#[from] RecordError),
    /// Identifier could not be encoded or decoded.
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
    /// Account service lookup failed.
    #[error(transparent)]
    Service(#[from] AccountServiceError),
    /// A feature the step depends on is not enabled for the account.
    #[error("feature {feature} is not enabled for account {account_id}")]
    MissingFeature {
        /// Feature name.
        feature: String,
        /// Account that was queried.
        account_id: AccountId,
    },
    /// Live data could not be applied to the record.
    #[error("invalid upgrade input: {0}")]
    Invalid(String),
}

/// Ladder construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LadderError {
    /// No step is registered for a version below the highest step.
    #[error("{resource} ladder has no step for version {version}")]
    Gap {
        /// Resource kind of the ladder.
        resource: ResourceKind,
        /// First version without a step.
        version: SchemaVersion,
    },
    /// Two steps start from the same version.
    #[error("{resource} ladder has more than one step for version {version}")]
    Duplicate {
        /// Resource kind of the ladder.
        resource: ResourceKind,
        /// Duplicated origin version.
        version: SchemaVersion,
    },
    /// The highest step has no representable target version.
    #[error("{resource} ladder exceeds the maximum schema version")]
    VersionOverflow {
        /// Resource kind of the ladder.
        resource: ResourceKind,
    },
    /// Two ladders target the same resource kind.
    #[error("more than one ladder registered for {0}")]
    DuplicateResource(ResourceKind),
}

/// Migration errors returned to the reconciliation layer.
///
/// # Invariants
/// - A returned error means no upgraded record was produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrationError {
    /// A version below current has no registered step.
    #[error("{resource} ladder has no step for version {version}")]
    LadderGap {
        /// Resource kind being migrated.
        resource: ResourceKind,
        /// Version without a step.
        version: SchemaVersion,
    },
    /// The stored record was written by a newer schema.
    #[error("{resource} state version {stored} is newer than supported version {current}")]
    UnsupportedFutureVersion {
        /// Resource kind being migrated.
        resource: ResourceKind,
        /// Version tag of the stored record.
        stored: SchemaVersion,
        /// Current version of the ladder.
        current: SchemaVersion,
    },
    /// An upgrade step failed.
    #[error("{resource} upgrade step `{step}` from version {from} failed: {source}")]
    StepFailure {
        /// Resource kind being migrated.
        resource: ResourceKind,
        /// Origin version of the failing step.
        from: SchemaVersion,
        /// Name of the failing step.
        step: &'static str,
        /// Step failure cause.
        source: StepError,
    },
}

impl MigrationError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::LadderGap {
                ..
            } => "ladder_gap",
            Self::UnsupportedFutureVersion {
                ..
            } => "unsupported_future_version",
            Self::StepFailure {
                ..
            } => "step_failure",
        }
    }

    /// Returns true when the underlying cause is a retryable service failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::StepFailure {
                source: StepError::Service(error),
                ..
            } => error.is_retryable(),
            _ => false,
        }
    }
}

// ============================================================================
// SECTION: Step Context
// ============================================================================

/// Ambient context handed to an upgrade step.
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    /// Resource kind being migrated.
    pub resource: ResourceKind,
    /// Version of the record handed to the step.
    pub from_version: SchemaVersion,
    /// Account service for live lookups.
    pub service: &'a dyn AccountService,
}

impl StepContext<'_> {
    /// Returns the enabled features of an account.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Service`] when the lookup fails.
    pub fn enabled_features(&self, account_id: AccountId) -> Result<FeatureStatusMap, StepError> {
        Ok(self.service.enabled_features(account_id)?)
    }

    /// Returns the status of a feature that must be enabled.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Service`] when the lookup fails and
    /// [`StepError::MissingFeature`] when the feature is not enabled.
    pub fn required_feature_status(
        &self,
        account_id: AccountId,
        feature: &str,
    ) -> Result<String, StepError> {
        let mut features = self.enabled_features(account_id)?;
        features.remove(feature).ok_or_else(|| StepError::MissingFeature {
            feature: feature.to_string(),
            account_id,
        })
    }

    /// Returns the details of an account.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Service`] when the lookup fails.
    pub fn account_details(&self, account_id: AccountId) -> Result<AccountDetails, StepError> {
        Ok(self.service.account_details(account_id)?)
    }
}

impl fmt::Debug for StepContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepContext")
            .field("resource", &self.resource)
            .field("from_version", &self.from_version)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Upgrade Step
// ============================================================================

/// Transformation from a version-N record to a version-N+1 record.
pub type StepFn = fn(StateRecord, &StepContext<'_>) -> Result<StateRecord, StepError>;

/// One released schema transition.
///
/// # Invariants
/// - Never changed after release; old records must stay upgradable.
#[derive(Clone, Copy)]
pub struct UpgradeStep {
    /// Version the step consumes.
    from: SchemaVersion,
    /// Stable step name used in errors and audit events.
    name: &'static str,
    /// Transformation.
    apply: StepFn,
    /// Field declarations of the produced version.
    output_fields: &'static [FieldSpec],
}

impl UpgradeStep {
    /// Declares an upgrade step from version `from` to `from + 1`.
    #[must_use]
    pub const fn new(
        from: u32,
        name: &'static str,
        apply: StepFn,
        output_fields: &'static [FieldSpec],
    ) -> Self {
        Self {
            from: SchemaVersion::new(from),
            name,
            apply,
            output_fields,
        }
    }

    /// Returns the version the step consumes.
    #[must_use]
    pub const fn from_version(&self) -> SchemaVersion {
        self.from
    }

    /// Returns the step name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the field declarations of the produced version.
    #[must_use]
    pub const fn output_fields(&self) -> &'static [FieldSpec] {
        self.output_fields
    }

    /// Runs the transformation and checks the produced record.
    ///
    /// # Errors
    ///
    /// Returns the step's own error, or [`StepError::Record`] when the output
    /// violates the declared fields.
    pub fn apply(&self, record: StateRecord, ctx: &StepContext<'_>) -> Result<StateRecord, StepError> {
        let upgraded = (self.apply)(record, ctx)?;
        validate_fields(&upgraded, self.output_fields)?;
        Ok(upgraded)
    }
}

impl fmt::Debug for UpgradeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpgradeStep")
            .field("from", &self.from)
            .field("name", &self.name)
            .field("output_fields", &self.output_fields)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Ladder
// ============================================================================

/// Validated, immutable chain of upgrade steps for one resource kind.
///
/// # Invariants
/// - `steps[n].from_version() == n` for every index.
/// - `current == steps.len()`.
#[derive(Debug, Clone)]
pub struct SchemaLadder {
    /// Resource kind the ladder migrates.
    resource: ResourceKind,
    /// Current schema version.
    current: SchemaVersion,
    /// Steps ordered by origin version.
    steps: Vec<UpgradeStep>,
}

impl SchemaLadder {
    /// Builds a ladder, rejecting gaps and duplicate steps.
    ///
    /// # Errors
    ///
    /// Returns [`LadderError`] when the steps do not cover every version from
    /// 0 to the highest step exactly once.
    pub fn new(resource: ResourceKind, mut steps: Vec<UpgradeStep>) -> Result<Self, LadderError> {
        steps.sort_by_key(UpgradeStep::from_version);
        let mut expected = SchemaVersion::INITIAL;
        for step in &steps {
            if step.from < expected {
                return Err(LadderError::Duplicate {
                    resource,
                    version: step.from,
                });
            }
            if step.from > expected {
                return Err(LadderError::Gap {
                    resource,
                    version: expected,
                });
            }
            expected = step.from.next().ok_or(LadderError::VersionOverflow {
                resource,
            })?;
        }
        Ok(Self {
            resource,
            current: expected,
            steps,
        })
    }

    /// Returns the resource kind.
    #[must_use]
    pub const fn resource(&self) -> ResourceKind {
        self.resource
    }

    /// Returns the current schema version.
    #[must_use]
    pub const fn current_version(&self) -> SchemaVersion {
        self.current
    }

    /// Returns all steps in version order.
    #[must_use]
    pub fn steps(&self) -> &[UpgradeStep] {
        &self.steps
    }

    /// Returns the step consuming `version`, if any.
    #[must_use]
    pub fn step_for(&self, version: SchemaVersion) -> Option<&UpgradeStep> {
        let index = usize::try_from(version.get()).ok()?;
        self.steps.get(index).filter(|step| step.from == version)
    }

    /// Returns the steps needed to bring a `from` record to current.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::UnsupportedFutureVersion`] when `from` is
    /// newer than current.
    pub fn plan(&self, from: SchemaVersion) -> Result<&[UpgradeStep], MigrationError> {
        if from > self.current {
            return Err(MigrationError::UnsupportedFutureVersion {
                resource: self.resource,
                stored: from,
                current: self.current,
            });
        }
        usize::try_from(from.get())
            .ok()
            .and_then(|index| self.steps.get(index ..))
            .ok_or(MigrationError::LadderGap {
                resource: self.resource,
                version: from,
            })
    }

    /// Upgrades a record from `from` to the current version.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError`] on a future version, a missing step, or the
    /// first failing step.
    pub fn upgrade(
        &self,
        record: StateRecord,
        from: SchemaVersion,
        service: &dyn AccountService,
    ) -> Result<StateRecord, MigrationError> {
        let mut record = record;
        let mut tracked = from;
        for step in self.plan(from)? {
            record = self.apply_step(step, tracked, record, service)?;
            tracked = self.next_version(tracked)?;
        }
        Ok(record)
    }

    /// Applies one step after checking it consumes `tracked`.
    pub(crate) fn apply_step(
        &self,
        step: &UpgradeStep,
        tracked: SchemaVersion,
        record: StateRecord,
        service: &dyn AccountService,
    ) -> Result<StateRecord, MigrationError> {
        if step.from != tracked {
            return Err(MigrationError::LadderGap {
                resource: self.resource,
                version: tracked,
            });
        }
        let ctx = StepContext {
            resource: self.resource,
            from_version: tracked,
            service,
        };
        step.apply(record, &ctx).map_err(|source| MigrationError::StepFailure {
            resource: self.resource,
            from: tracked,
            step: step.name,
            source,
        })
    }

    /// Returns the version after `tracked`.
    pub(crate) fn next_version(&self, tracked: SchemaVersion) -> Result<SchemaVersion, MigrationError> {
        tracked.next().ok_or(MigrationError::LadderGap {
            resource: self.resource,
            version: tracked,
        })
    }
}

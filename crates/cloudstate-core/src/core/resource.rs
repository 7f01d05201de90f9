// crates/cloudstate-core/src/core/resource.rs
// ============================================================================
// Module: Resource Kinds
// Description: Closed set of resource kinds with versioned state.
// Purpose: Stable labels for ladders, configuration, CLI, and audit events.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! [`ResourceKind`] names every resource with a schema ladder. Labels are
//! snake_case and stable; derived ordering follows label order so registries
//! iterate alphabetically.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Resource Kind
// ============================================================================

/// Resource kinds whose persisted state is versioned.
///
/// # Invariants
/// - Labels are stable; they appear in persisted audit logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// AWS account onboarded for cloud-native protection.
    AwsAccount,
    /// Trust policy for an AWS account role.
    AwsTrustPolicy,
    /// Azure subscription onboarded for cloud-native protection.
    AzureSubscription,
    /// Enabled feature set read for an account.
    FeatureSet,
    /// GCP project onboarded for cloud-native protection.
    GcpProject,
}

impl ResourceKind {
    /// All resource kinds in label order.
    pub const ALL: [Self; 5] = [
        Self::AwsAccount,
        Self::AwsTrustPolicy,
        Self::AzureSubscription,
        Self::FeatureSet,
        Self::GcpProject,
    ];

    /// Returns the stable label for the resource kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwsAccount => "aws_account",
            Self::AwsTrustPolicy => "aws_trust_policy",
            Self::AzureSubscription => "azure_subscription",
            Self::GcpProject => "gcp_project",
            Self::FeatureSet => "feature_set",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown resource kind label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resource kind: {0}")]
pub struct UnknownResourceKind(pub String);

impl FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownResourceKind(value.to_string()))
    }
}

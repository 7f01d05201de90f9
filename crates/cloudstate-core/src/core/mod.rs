// crates/cloudstate-core/src/core/mod.rs
// ============================================================================
// Module: Cloud Account State Core Types
// Description: Identifiers, fingerprints, records, and schema declarations.
// Purpose: Provide stable, serializable types shared by every ladder.
// Dependencies: serde, serde_jcs, serde_json, sha2, uuid
// ============================================================================

//! ## Overview
//! Core types are pure: nothing here calls the account service or performs
//! I/O. Runtime components compose them into ladders and migrations.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod features;
pub mod fingerprint;
pub mod hashing;
pub mod identifiers;
pub mod record;
pub mod resource;
pub mod schema;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use features::CLOUD_NATIVE_ARCHIVAL;
pub use features::CLOUD_NATIVE_PROTECTION;
pub use features::EXOCOMPUTE;
pub use features::FeatureSnapshot;
pub use features::FeatureStatusMap;
pub use features::RDS_PROTECTION;
pub use fingerprint::FINGERPRINT_HEX_LENGTH;
pub use fingerprint::FeatureFingerprint;
pub use fingerprint::fingerprint_features;
pub use hashing::HashError;
pub use hashing::StateDigest;
pub use hashing::digest_state;
pub use identifiers::AccountId;
pub use identifiers::CompositeId;
pub use identifiers::IDENTIFIER_SEPARATOR;
pub use identifiers::IdentifierError;
pub use identifiers::decode_identifier;
pub use identifiers::encode_identifier;
pub use record::RecordError;
pub use record::StateRecord;
pub use record::VersionedRecord;
pub use resource::ResourceKind;
pub use resource::UnknownResourceKind;
pub use schema::FieldShape;
pub use schema::FieldSpec;
pub use schema::SchemaVersion;
pub use schema::validate_fields;

// crates/cloudstate-config/src/config.rs
// ============================================================================
// Module: Cloud Account State Configuration
// Description: Configuration loading and validation for migration tooling.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the caller, then the `CLOUDSTATE_CONFIG` environment
//! variable, then `cloudstate.toml` in the working directory. Unknown keys and
//! out-of-range limits are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "cloudstate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CLOUDSTATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default maximum state file size in bytes.
pub const DEFAULT_MAX_STATE_BYTES: usize = 1024 * 1024;
/// Hard ceiling for the state file size limit.
pub const MAX_STATE_BYTES_CEILING: usize = 16 * 1024 * 1024;
/// Default maximum fixture file size in bytes.
pub const DEFAULT_MAX_FIXTURE_BYTES: usize = 4 * 1024 * 1024;
/// Hard ceiling for the fixture file size limit.
pub const MAX_FIXTURE_BYTES_CEILING: usize = 64 * 1024 * 1024;

// ============================================================================
// SECTION: Config Root
// ============================================================================

/// Migration tooling configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloudStateConfig {
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Account service configuration.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Input size limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Directory of the loaded config file (not serialized).
    #[serde(skip)]
    pub source_dir: Option<PathBuf>,
}

impl CloudStateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        Self::load_resolved(&resolved)
    }

    /// Loads configuration, or returns defaults when no config is present.
    ///
    /// Defaults apply only when no explicit path is given, the environment
    /// override is unset, and the default file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a config file is selected but cannot be
    /// loaded or validated.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if path.is_none() && env::var_os(CONFIG_ENV_VAR).is_none() {
            let default_path = Path::new(DEFAULT_CONFIG_NAME);
            if !default_path.exists() {
                return Ok(Self::default());
            }
        }
        Self::load(path)
    }

    /// Parses configuration from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.audit.validate()?;
        self.service.validate()?;
        self.limits.validate()?;
        Ok(())
    }

    /// Resolves a configured path relative to the config file directory.
    #[must_use]
    pub fn resolve_relative(&self, value: &str) -> PathBuf {
        let path = Path::new(value.trim());
        match &self.source_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Returns the resolved fixture path, when configured.
    #[must_use]
    pub fn fixtures_path(&self) -> Option<PathBuf> {
        self.service.fixtures.as_deref().map(|value| self.resolve_relative(value))
    }

    /// Returns the resolved audit log path, when configured.
    #[must_use]
    pub fn audit_path(&self) -> Option<PathBuf> {
        self.audit.path.as_deref().map(|value| self.resolve_relative(value))
    }

    /// Reads, parses, and validates a resolved config file.
    fn load_resolved(resolved: &Path) -> Result<Self, ConfigError> {
        validate_path(resolved)?;
        let bytes = fs::read(resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml_str(content)?;
        config.source_dir = resolved.parent().map(Path::to_path_buf);
        Ok(config)
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Destination for migration audit events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard events.
    None,
}

/// Audit configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => Err(ConfigError::Invalid(
                "audit.path is required when audit.sink is file".to_string(),
            )),
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (_, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid when audit.sink is file".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Account service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// JSON fixture file backing the account service.
    #[serde(default)]
    pub fixtures: Option<String>,
}

impl ServiceConfig {
    /// Validates service settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.fixtures {
            validate_path_string("service.fixtures", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Input size limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum versioned state file size in bytes.
    #[serde(default = "default_max_state_bytes")]
    pub max_state_bytes: usize,
    /// Maximum account fixture file size in bytes.
    #[serde(default = "default_max_fixture_bytes")]
    pub max_fixture_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_state_bytes: default_max_state_bytes(),
            max_fixture_bytes: default_max_fixture_bytes(),
        }
    }
}

impl LimitsConfig {
    /// Validates size limits.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_limit("limits.max_state_bytes", self.max_state_bytes, MAX_STATE_BYTES_CEILING)?;
        validate_limit(
            "limits.max_fixture_bytes",
            self.max_fixture_bytes,
            MAX_FIXTURE_BYTES_CEILING,
        )
    }
}

/// Default state size limit.
const fn default_max_state_bytes() -> usize {
    DEFAULT_MAX_STATE_BYTES
}

/// Default fixture size limit.
const fn default_max_fixture_bytes() -> usize {
    DEFAULT_MAX_FIXTURE_BYTES
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the argument, environment, or default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a byte limit is non-zero and below its ceiling.
fn validate_limit(field: &str, value: usize, ceiling: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid(format!("{field} must be greater than zero")));
    }
    if value > ceiling {
        return Err(ConfigError::Invalid(format!("{field} must be at most {ceiling}")));
    }
    Ok(())
}

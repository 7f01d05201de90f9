// crates/cloudstate-cli/src/main.rs
// ============================================================================
// Module: Cloud Account State CLI Entry Point
// Description: Command dispatcher for offline state migration tooling.
// Purpose: Migrate state files and inspect identifiers, fingerprints, ladders.
// Dependencies: clap, cloudstate-config, cloudstate-core, serde, thiserror.
// ============================================================================

//! ## Overview
//! The `cloudstate` CLI runs the same ladders and executor the reconciliation
//! layer uses, but against state files on disk. Account lookups are answered
//! from a fixture file named in the configuration; without one, steps that
//! need live data fail. Inputs are untrusted and read with hard size limits.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use cloudstate_config::AuditSinkKind;
use cloudstate_config::CloudStateConfig;
use cloudstate_core::AccountId;
use cloudstate_core::AccountService;
use cloudstate_core::FileMigrationAuditSink;
use cloudstate_core::LadderRegistry;
use cloudstate_core::MigrationAuditSink;
use cloudstate_core::NoopMigrationAuditSink;
use cloudstate_core::ResourceKind;
use cloudstate_core::SchemaLadder;
use cloudstate_core::SchemaVersion;
use cloudstate_core::StaticAccountService;
use cloudstate_core::StderrMigrationAuditSink;
use cloudstate_core::UnavailableAccountService;
use cloudstate_core::VersionedRecord;
use cloudstate_core::decode_identifier;
use cloudstate_core::encode_identifier;
use cloudstate_core::fingerprint_features;
use cloudstate_core::runtime::read_feature_snapshot;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "cloudstate", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Migrate a versioned state file to the current schema.
    Migrate(MigrateCommand),
    /// Composite identifier utilities.
    Identifier {
        /// Selected identifier subcommand.
        #[command(subcommand)]
        command: IdentifierCommand,
    },
    /// Compute the fingerprint of a feature-name set.
    Fingerprint(FingerprintCommand),
    /// Read an account's enabled features through the configured service.
    Features(FeaturesCommand),
    /// Schema ladder utilities.
    Ladder {
        /// Selected ladder subcommand.
        #[command(subcommand)]
        command: LadderCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `migrate`.
#[derive(Args, Debug)]
struct MigrateCommand {
    /// Resource kind of the state file.
    #[arg(long, value_name = "KIND", value_parser = parse_resource_kind)]
    resource: ResourceKind,
    /// Versioned state file (`{"schema_version": N, "state": {...}}`).
    #[arg(long, value_name = "FILE")]
    input: PathBuf,
    /// Optional config file path.
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,
}

/// Identifier subcommands.
#[derive(Subcommand, Debug)]
enum IdentifierCommand {
    /// Encode a key and account into a composite identifier.
    Encode(IdentifierEncodeCommand),
    /// Decode a composite identifier into its components.
    Decode(IdentifierDecodeCommand),
}

/// Arguments for `identifier encode`.
#[derive(Args, Debug)]
struct IdentifierEncodeCommand {
    /// Opaque key component.
    #[arg(long, value_name = "KEY")]
    key: String,
    /// Account UUID component.
    #[arg(long, value_name = "UUID")]
    account: String,
}

/// Arguments for `identifier decode`.
#[derive(Args, Debug)]
struct IdentifierDecodeCommand {
    /// Encoded composite identifier.
    #[arg(value_name = "ID")]
    id: String,
}

/// Arguments for `fingerprint`.
#[derive(Args, Debug)]
struct FingerprintCommand {
    /// Enabled feature names, in any order.
    #[arg(value_name = "FEATURE")]
    names: Vec<String>,
}

/// Arguments for `features`.
#[derive(Args, Debug)]
struct FeaturesCommand {
    /// Account UUID to read.
    #[arg(long, value_name = "UUID")]
    account: String,
    /// Optional config file path.
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,
}

/// Ladder subcommands.
#[derive(Subcommand, Debug)]
enum LadderCommand {
    /// List every built-in ladder with its steps.
    List,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a config file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path.
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// Decoded identifier output.
#[derive(Debug, Serialize)]
struct DecodedIdentifier {
    /// Key component.
    key: String,
    /// Account component.
    account_id: AccountId,
}

/// Ladder listing entry.
#[derive(Debug, Serialize)]
struct LadderSummary {
    /// Resource kind label.
    resource: ResourceKind,
    /// Current schema version.
    current_version: SchemaVersion,
    /// Steps in version order.
    steps: Vec<StepSummary>,
}

/// Ladder step listing entry.
#[derive(Debug, Serialize)]
struct StepSummary {
    /// Origin version.
    from: SchemaVersion,
    /// Step name.
    name: &'static str,
}

impl LadderSummary {
    /// Summarizes a ladder for output.
    fn from_ladder(ladder: &SchemaLadder) -> Self {
        Self {
            resource: ladder.resource(),
            current_version: ladder.current_version(),
            steps: ladder
                .steps()
                .iter()
                .map(|step| StepSummary {
                    from: step.from_version(),
                    name: step.name(),
                })
                .collect(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Migrate(command) => command_migrate(&command),
        Commands::Identifier {
            command,
        } => command_identifier(command),
        Commands::Fingerprint(command) => command_fingerprint(&command),
        Commands::Features(command) => command_features(&command),
        Commands::Ladder {
            command,
        } => command_ladder(&command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

// ============================================================================
// SECTION: Migrate Command
// ============================================================================

/// Executes the `migrate` command.
fn command_migrate(command: &MigrateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let bytes = read_bytes_with_limit(&command.input, config.limits.max_state_bytes)
        .map_err(|err| CliError::new(read_error("state file", &command.input, &err)))?;
    let input: VersionedRecord = serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(format!("invalid state file: {err}")))?;

    let registry = builtin_registry()?;
    let service = build_account_service(&config)?;
    let audit = build_audit_sink(&config)?;
    let executor = registry
        .executor(command.resource, service.as_ref(), audit.as_ref())
        .ok_or_else(|| CliError::new(format!("no ladder registered for {}", command.resource)))?;
    let output = executor
        .run_versioned(input)
        .map_err(|err| CliError::new(format!("migration failed: {err}")))?;
    write_json(&output)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Identifier Commands
// ============================================================================

/// Dispatches identifier subcommands.
fn command_identifier(command: IdentifierCommand) -> CliResult<ExitCode> {
    match command {
        IdentifierCommand::Encode(command) => command_identifier_encode(&command),
        IdentifierCommand::Decode(command) => command_identifier_decode(&command),
    }
}

/// Executes `identifier encode`.
fn command_identifier_encode(command: &IdentifierEncodeCommand) -> CliResult<ExitCode> {
    let account_id = parse_account(&command.account)?;
    let encoded = encode_identifier(&command.key, account_id)
        .map_err(|err| CliError::new(format!("cannot encode identifier: {err}")))?;
    write_stdout_line(&encoded).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `identifier decode`.
fn command_identifier_decode(command: &IdentifierDecodeCommand) -> CliResult<ExitCode> {
    let decoded = decode_identifier(&command.id)
        .map_err(|err| CliError::new(format!("cannot decode identifier: {err}")))?;
    let (key, account_id) = decoded.into_parts();
    write_json(&DecodedIdentifier {
        key,
        account_id,
    })?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Feature Commands
// ============================================================================

/// Executes `fingerprint`.
fn command_fingerprint(command: &FingerprintCommand) -> CliResult<ExitCode> {
    let fingerprint = fingerprint_features(&command.names);
    write_stdout_line(fingerprint.as_str())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `features`.
fn command_features(command: &FeaturesCommand) -> CliResult<ExitCode> {
    let account_id = parse_account(&command.account)?;
    let config = load_config(command.config.as_deref())?;
    let service = build_account_service(&config)?;
    let snapshot = read_feature_snapshot(service.as_ref(), account_id)
        .map_err(|err| CliError::new(format!("feature lookup failed: {err}")))?;
    write_json(&snapshot)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Ladder Commands
// ============================================================================

/// Dispatches ladder subcommands.
fn command_ladder(command: &LadderCommand) -> CliResult<ExitCode> {
    match command {
        LadderCommand::List => {
            let registry = builtin_registry()?;
            let summaries: Vec<LadderSummary> =
                registry.iter().map(LadderSummary::from_ladder).collect();
            write_json(&summaries)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = CloudStateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Runtime Wiring
// ============================================================================

/// Loads the config, falling back to defaults when none is present.
fn load_config(path: Option<&Path>) -> CliResult<CloudStateConfig> {
    CloudStateConfig::load_or_default(path)
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

/// Builds the registry of built-in ladders.
fn builtin_registry() -> CliResult<LadderRegistry> {
    LadderRegistry::builtin()
        .map_err(|err| CliError::new(format!("built-in ladders are invalid: {err}")))
}

/// Builds the account service named by the config.
fn build_account_service(config: &CloudStateConfig) -> CliResult<Box<dyn AccountService>> {
    let Some(path) = config.fixtures_path() else {
        return Ok(Box::new(UnavailableAccountService));
    };
    let bytes = read_bytes_with_limit(&path, config.limits.max_fixture_bytes)
        .map_err(|err| CliError::new(read_error("fixture file", &path, &err)))?;
    let service = StaticAccountService::from_json_slice(&bytes)
        .map_err(|err| CliError::new(format!("invalid fixture file: {err}")))?;
    Ok(Box::new(service))
}

/// Builds the audit sink named by the config.
fn build_audit_sink(config: &CloudStateConfig) -> CliResult<Box<dyn MigrationAuditSink>> {
    match config.audit.sink {
        AuditSinkKind::Stderr => Ok(Box::new(StderrMigrationAuditSink)),
        AuditSinkKind::None => Ok(Box::new(NoopMigrationAuditSink)),
        AuditSinkKind::File => {
            let path = config
                .audit_path()
                .ok_or_else(|| CliError::new("audit.path is not configured".to_string()))?;
            let sink = FileMigrationAuditSink::new(&path).map_err(|err| {
                CliError::new(format!("cannot open audit log {}: {err}", path.display()))
            })?;
            Ok(Box::new(sink))
        }
    }
}

/// Parses a resource kind label for clap.
fn parse_resource_kind(value: &str) -> Result<ResourceKind, String> {
    value.parse::<ResourceKind>().map_err(|err| err.to_string())
}

/// Parses an account UUID argument.
fn parse_account(value: &str) -> CliResult<AccountId> {
    AccountId::parse(value).map_err(|err| CliError::new(format!("invalid account: {err}")))
}

// ============================================================================
// SECTION: Bounded Reads
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Formats a bounded read failure.
fn read_error(label: &str, path: &Path, error: &ReadLimitError) -> String {
    match error {
        ReadLimitError::Io(err) => format!("cannot read {label} {}: {err}", path.display()),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => format!("{label} {} is {size} bytes; limit is {limit}", path.display()),
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a value as pretty JSON on stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("cannot render output: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

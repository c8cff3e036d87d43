//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use hivemap_config::ConfigError;
use hivemap_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const LOAD: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Loading ──────────────────────────────────────────────────────
    #[error("Could not load facilities from {source_name}")]
    #[diagnostic(
        code(hivemap::load_failed),
        help(
            "{reason}\n\
             Check the fixture path or URL, or pass one with --source."
        )
    )]
    LoadFailed { source_name: String, reason: String },

    #[error("Fixture not found: {source_name}")]
    #[diagnostic(
        code(hivemap::fixture_not_found),
        help(
            "Point --source (or HIVEMAP_SOURCE) at a facilities JSON file,\n\
             or set `source` in your profile: hivemap config init"
        )
    )]
    FixtureNotFound { source_name: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(hivemap::not_found),
        help("Run: hivemap {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hivemap::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(hivemap::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: hivemap config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(hivemap::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(hivemap::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Loading timed out after {seconds}s")]
    #[diagnostic(
        code(hivemap::timeout),
        help("Increase the limit with --timeout or check the fixture server.")
    )]
    Timeout { seconds: u64 },

    // ── Everything else ──────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(hivemap::internal))]
    Internal { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LoadFailed { .. } => exit_code::LOAD,
            Self::FixtureNotFound { .. } | Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LoadFailed {
                source_name,
                reason,
            } => CliError::LoadFailed {
                source_name,
                reason,
            },

            CoreError::FixtureNotFound { source_name } => CliError::FixtureNotFound { source_name },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotLoaded => CliError::Internal {
                message: "facilities were queried before loading finished".into(),
            },

            CoreError::FacilityNotFound { identifier } => CliError::NotFound {
                resource_type: "facility".into(),
                identifier,
                list_command: "facilities list".into(),
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Export { message } => CliError::Internal {
                message: format!("export failed: {message}"),
            },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

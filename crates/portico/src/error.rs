//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use portico_config::ConfigError;
use portico_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const IO: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Health ───────────────────────────────────────────────────────
    #[error("{unreachable} of {total} project(s) unreachable")]
    #[diagnostic(
        code(portico::unhealthy),
        help("Run with -v to log the cause of each failure.")
    )]
    Unhealthy { unreachable: usize, total: usize },

    #[error("Could not set up the health probe client")]
    #[diagnostic(
        code(portico::transport),
        help("Check polling.ca_cert, or use --insecure (-k) for self-signed endpoints.")
    )]
    Transport {
        #[source]
        source: CoreError,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(portico::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file not found")]
    #[diagnostic(
        code(portico::no_config),
        help(
            "Create one with: portico config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration file already exists: {path}")]
    #[diagnostic(
        code(portico::config_exists),
        help("Use --force (-f) to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error("Invalid configuration: {field}: {reason}")]
    #[diagnostic(
        code(portico::invalid_config),
        help("Fix the value in your config file, then run: portico config validate")
    )]
    InvalidConfig { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(portico::config))]
    Config(Box<figment::Error>),

    #[error("Failed to serialize config: {0}")]
    #[diagnostic(code(portico::serialize))]
    Serialization(#[from] toml::ser::Error),

    // ── IO ───────────────────────────────────────────────────────────
    #[error("Failed to write page to {path}")]
    #[diagnostic(
        code(portico::page_write),
        help("Check that the output directory is writable.")
    )]
    PageWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => exit_code::USAGE,
            Self::NoConfig { .. }
            | Self::ConfigExists { .. }
            | Self::InvalidConfig { .. }
            | Self::Config(_) => exit_code::CONFIG,
            Self::PageWrite { .. } | Self::Io(_) => exit_code::IO,
            Self::Unhealthy { .. } | Self::Transport { .. } | Self::Serialization(_) => {
                exit_code::GENERAL
            }
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::InvalidConfig { field, reason },
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Serialization(e) => Self::Serialization(e),
            ConfigError::Io(e) => Self::Io(e),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DuplicateProject { id } => Self::InvalidConfig {
                field: "projects".into(),
                reason: format!("duplicate project id '{id}'"),
            },
            CoreError::PageWrite { path, source } => Self::PageWrite { path, source },
            err @ CoreError::Probe(_) => Self::Transport { source: err },
        }
    }
}

//! Clap derive structures for the `portico` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// portico -- landing page and health checks for a multi-project platform
#[derive(Debug, Parser)]
#[command(
    name = "portico",
    version,
    about = "Render a project landing page and keep its status badges live",
    long_about = "Renders a static landing page with one card per sub-project and\n\
        keeps each card's ONLINE/OFFLINE badge current by polling the\n\
        project's health endpoint.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "PORTICO_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PORTICO_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates on health endpoints
    #[arg(long, short = 'k', env = "PORTICO_INSECURE", global = true)]
    pub insecure: bool,

    /// Health probe timeout in seconds (overrides polling.timeout_secs)
    #[arg(long, env = "PORTICO_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Origin for relative health endpoints (overrides site.base_url)
    #[arg(long, env = "PORTICO_BASE_URL", global = true)]
    pub base_url: Option<String>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the landing page once with the configured statuses
    Render(RenderArgs),

    /// Serve the live landing page: render, poll, and rewrite until Ctrl-C
    #[command(alias = "serve")]
    Watch(WatchArgs),

    /// Probe every project's health endpoint and report
    #[command(alias = "health")]
    Check(CheckArgs),

    /// List configured projects
    #[command(alias = "ls")]
    Projects,

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Page commands ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Output file (defaults to site.output, or stdout)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Output file (defaults to site.output)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Poll interval, e.g. "30s" or "2m" (overrides polling.interval_secs)
    #[arg(long, value_parser = parse_interval)]
    pub interval: Option<Duration>,
}

// ── Health ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Repeat every N seconds until Ctrl-C
    #[arg(long, short = 'w', value_name = "SECS")]
    pub watch: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display current resolved configuration
    Show,

    /// Write a starter config file
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Load and validate the configuration
    Validate,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

/// Accept bare seconds ("30") or a humantime duration ("30s", "2m").
fn parse_interval(raw: &str) -> Result<Duration, String> {
    let duration = raw.parse::<u64>().map_or_else(
        |_| humantime::parse_duration(raw).map_err(|e| e.to_string()),
        |secs| Ok(Duration::from_secs(secs)),
    )?;
    if duration.is_zero() {
        return Err("interval must be greater than 0".into());
    }
    Ok(duration)
}

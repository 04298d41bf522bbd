//! CLI configuration: thin wrapper around `portico_config`.
//!
//! Resolves the config file location from `--config` and applies the
//! global flag overrides (`--insecure`, `--timeout`, `--base-url`).

use std::path::PathBuf;

use portico_core::PortalConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use portico_config::{Config, read_config_from, save_config_to};

// ── CLI-specific helpers ────────────────────────────────────────────

/// `--config` / `PORTICO_CONFIG`, else the platform default.
pub fn resolve_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(portico_config::config_path)
}

/// Load the config file with flag overrides applied.
///
/// Unlike the library loader, a missing file is an error here: every
/// command that calls this needs at least one project to work with.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = resolve_path(global);
    if !path.is_file() {
        return Err(CliError::NoConfig {
            path: path.display().to_string(),
        });
    }

    // Validate once, after flags have had their say.
    let mut cfg = read_config_from(&path)?;
    apply_overrides(&mut cfg, global);
    cfg.validate()?;
    Ok(cfg)
}

/// Load, override, and translate to the runtime config in one step.
pub fn load_portal_config(global: &GlobalOpts) -> Result<(Config, PortalConfig), CliError> {
    let cfg = load(global)?;
    let portal = cfg.to_portal_config()?;
    Ok((cfg, portal))
}

/// CLI flag overrides take priority over file and environment values.
fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if global.insecure {
        cfg.polling.insecure = true;
    }
    if let Some(secs) = global.timeout {
        cfg.polling.timeout_secs = secs;
    }
    if let Some(ref base) = global.base_url {
        cfg.site.base_url = Some(base.clone());
    }
}

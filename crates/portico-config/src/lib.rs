//! Configuration for the portico landing page.
//!
//! One TOML file describes the page, the projects, and how they are
//! probed. Loading layers built-in defaults, the file, and `PORTICO_*`
//! environment variables; [`Config::to_portal_config`] validates the result
//! and translates it to `portico_core::PortalConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use portico_core::{
    AggregateStats, PageLayout, PortalConfig, ProjectDescriptor, ProjectMetadata, ProjectStatus,
    TickPolicy, TlsVerification,
};

/// File name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "portico.toml";

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "PORTICO_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub site: Site,

    #[serde(default)]
    pub polling: Polling,

    #[serde(default)]
    pub stats: AggregateStats,

    /// Projects in display order.
    #[serde(default)]
    pub projects: Vec<ProjectDescriptor>,

    /// Project id -> health endpoint.
    #[serde(default)]
    pub health_check_endpoints: IndexMap<String, String>,
}

/// Page-level settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Site {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub tagline: String,

    /// Origin that relative health endpoints resolve against.
    pub base_url: Option<String>,

    #[serde(default = "default_link_label")]
    pub link_label: String,

    /// Delay between consecutive cards' entrance animations.
    #[serde(default = "default_card_stagger_ms")]
    pub card_stagger_ms: u64,

    /// Browser reload interval written into the page; unset or 0 disables it.
    pub auto_refresh_secs: Option<u64>,

    #[serde(default = "default_true")]
    pub show_stats: bool,

    /// Default output file for `render` and `watch`.
    pub output: Option<PathBuf>,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            title: default_title(),
            tagline: String::new(),
            base_url: None,
            link_label: default_link_label(),
            card_stagger_ms: default_card_stagger_ms(),
            auto_refresh_secs: None,
            show_stats: true,
            output: None,
        }
    }
}

fn default_title() -> String {
    "Projects".into()
}
fn default_link_label() -> String {
    "Open project".into()
}
fn default_card_stagger_ms() -> u64 {
    100
}
fn default_true() -> bool {
    true
}

/// Health polling settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Polling {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// `skip` or `overlap`.
    #[serde(default)]
    pub overlap: TickPolicy,

    /// Accept invalid TLS certificates on health endpoints.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,
}

impl Default for Polling {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            timeout_secs: default_timeout(),
            overlap: TickPolicy::default(),
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_interval() -> u64 {
    30
}
fn default_timeout() -> u64 {
    5
}

// ── Validation and translation ──────────────────────────────────────

impl Config {
    /// Check everything that can be checked without the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;

        if self.polling.interval_secs == 0 {
            return Err(invalid("polling.interval_secs", "must be greater than 0"));
        }
        if self.polling.timeout_secs == 0 {
            return Err(invalid("polling.timeout_secs", "must be greater than 0"));
        }

        for (position, project) in self.projects.iter().enumerate() {
            if project.id.trim().is_empty() {
                return Err(invalid(
                    format!("projects[{position}].id"),
                    "must not be empty",
                ));
            }
        }
        Ok(())
    }

    /// Parsed `site.base_url`, if set.
    pub fn base_url(&self) -> Result<Option<Url>, ConfigError> {
        let Some(raw) = self.site.base_url.as_deref().filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let url = Url::parse(raw).map_err(|e| invalid("site.base_url", format!("{raw}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(
                "site.base_url",
                format!("expected an http(s) URL, got '{raw}'"),
            ));
        }
        Ok(Some(url))
    }

    pub fn tls(&self) -> TlsVerification {
        if self.polling.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca) = self.polling.ca_cert {
            TlsVerification::CustomCa(ca.clone())
        } else {
            TlsVerification::SystemDefaults
        }
    }

    /// Validate and build the runtime configuration.
    pub fn to_portal_config(&self) -> Result<PortalConfig, ConfigError> {
        self.validate()?;

        Ok(PortalConfig {
            projects: self.projects.clone(),
            stats: self.stats.clone(),
            health_endpoints: self.health_check_endpoints.clone(),
            base_url: self.base_url()?,
            poll_interval: Duration::from_secs(self.polling.interval_secs),
            probe_timeout: Duration::from_secs(self.polling.timeout_secs),
            tick_policy: self.polling.overlap,
            tls: self.tls(),
            link_label: self.site.link_label.clone(),
            card_stagger: Duration::from_millis(self.site.card_stagger_ms),
            layout: PageLayout {
                title: self.site.title.clone(),
                tagline: self.site.tagline.clone(),
                auto_refresh: self
                    .site
                    .auto_refresh_secs
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs),
                show_stats: self.site.show_stats,
            },
        })
    }

    /// Starter config describing a single crawler project.
    pub fn sample() -> Self {
        let mut health_check_endpoints = IndexMap::new();
        health_check_endpoints.insert("solar_news".into(), "/solar_news/api/health".into());

        Self {
            site: Site {
                title: "BUPT EDU LLM Platform".into(),
                tagline: "Data Intelligence Hub".into(),
                base_url: Some("http://localhost".into()),
                link_label: "访问项目".into(),
                card_stagger_ms: default_card_stagger_ms(),
                auto_refresh_secs: Some(30),
                show_stats: true,
                output: Some(PathBuf::from("public/index.html")),
            },
            polling: Polling::default(),
            stats: AggregateStats {
                total_projects: 1,
                active_projects: 1,
                system_uptime: "99.5%".into(),
                data_processed: "12.5k".into(),
            },
            projects: vec![ProjectDescriptor {
                id: "solar_news".into(),
                name: "Solar News Crawler".into(),
                icon: "☀️".into(),
                description: "多来源国际太阳能新闻聚合系统，自动抓取、翻译和展示全球太阳能行业动态"
                    .into(),
                path: "/solar_news/".into(),
                port: Some(5000),
                status: ProjectStatus::Online,
                tags: vec![
                    "新闻聚合".into(),
                    "Web爬虫".into(),
                    "翻译".into(),
                    "Flask".into(),
                ],
                metadata: ProjectMetadata {
                    version: "v0.1.0".into(),
                    last_update: "2025-11-19".into(),
                    uptime: "99.5%".into(),
                },
            }],
            health_check_endpoints,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "portico", "portico").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push(CONFIG_FILE_NAME);
            p
        },
        |dirs| dirs.config_dir().join(CONFIG_FILE_NAME),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("portico");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Merge defaults, `path`, and environment without validating.
///
/// Callers layering their own overrides on top validate afterwards.
pub fn read_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    Ok(figment.extract()?)
}

/// Load and validate config from `path` + environment.
///
/// A missing file is not an error; defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config = read_config_from(path)?;
    config.validate()?;
    Ok(config)
}

/// Load config from the canonical path.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sample_is_valid() {
        let portal = Config::sample().to_portal_config().unwrap();
        assert_eq!(portal.projects.len(), 1);
        assert_eq!(portal.poll_interval, Duration::from_secs(30));
        assert_eq!(portal.probe_timeout, Duration::from_secs(5));
        assert_eq!(portal.tick_policy, TickPolicy::Skip);
        assert_eq!(portal.tls, TlsVerification::SystemDefaults);
        assert_eq!(
            portal.base_url.as_ref().map(Url::as_str),
            Some("http://localhost/")
        );
        assert_eq!(portal.layout.auto_refresh, Some(Duration::from_secs(30)));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut cfg = Config::sample();
        cfg.polling.interval_secs = 0;
        let err = cfg.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation { ref field, .. } if field == "polling.interval_secs")
        );
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut cfg = Config::sample();
        cfg.polling.timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn bad_base_url_is_rejected() {
        for raw in ["not a url", "ftp://example.com"] {
            let mut cfg = Config::sample();
            cfg.site.base_url = Some(raw.into());
            let err = cfg.to_portal_config().unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation { ref field, .. } if field == "site.base_url"),
                "{raw}"
            );
        }
    }

    #[test]
    fn empty_project_id_is_rejected() {
        let mut cfg = Config::sample();
        cfg.projects[0].id = "  ".into();
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid projects[0].id: must not be empty");
    }

    #[test]
    fn tls_mode_follows_polling_settings() {
        let mut cfg = Config::sample();
        cfg.polling.ca_cert = Some("/etc/ca.pem".into());
        assert_eq!(cfg.tls(), TlsVerification::CustomCa("/etc/ca.pem".into()));
        cfg.polling.insecure = true;
        assert_eq!(cfg.tls(), TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn card_stagger_reaches_the_renderer() {
        let mut cfg = Config::sample();
        cfg.site.card_stagger_ms = 250;
        let portal = cfg.to_portal_config().unwrap();
        assert_eq!(portal.card_stagger, Duration::from_millis(250));

        let card = portal.renderer().card(&cfg.projects[0], 2);
        assert!(card.contains("animation-delay: 500ms;"), "{card}");
    }

    #[test]
    fn zero_auto_refresh_disables_it() {
        let mut cfg = Config::sample();
        cfg.site.auto_refresh_secs = Some(0);
        assert_eq!(cfg.to_portal_config().unwrap().layout.auto_refresh, None);
    }
}

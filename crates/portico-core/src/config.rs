// ── Runtime portal configuration ──
//
// These types describe what the portal shows and how it probes. They
// never touch disk; `portico-config` builds a `PortalConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use indexmap::IndexMap;
use portico_probe::{TlsMode, TransportConfig};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use crate::model::{AggregateStats, ProjectDescriptor};
use crate::render::{PageLayout, Renderer};

/// Default time between poll cycle starts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// What to do when a poll cycle is still running at the next tick.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TickPolicy {
    /// Run cycles inline and drop ticks missed while one is in flight.
    #[default]
    Skip,
    /// Start a new cycle on every tick, even if the previous one has not
    /// finished. Cycles may overlap.
    Overlap,
}

/// TLS verification strategy for health endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed sub-projects).
    DangerAcceptInvalid,
}

/// Everything a [`Portal`](crate::Portal) needs.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Projects in display order.
    pub projects: Vec<ProjectDescriptor>,
    pub stats: AggregateStats,
    /// Project id -> health endpoint (absolute URL or origin-relative path).
    pub health_endpoints: IndexMap<String, String>,
    /// Origin that relative endpoints resolve against.
    pub base_url: Option<Url>,
    /// Time between poll cycle starts.
    pub poll_interval: Duration,
    /// Per-probe deadline.
    pub probe_timeout: Duration,
    pub tick_policy: TickPolicy,
    pub tls: TlsVerification,
    /// Call-to-action text on each card.
    pub link_label: String,
    /// Entrance animation delay between consecutive cards.
    pub card_stagger: Duration,
    pub layout: PageLayout,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            stats: AggregateStats::default(),
            health_endpoints: IndexMap::new(),
            base_url: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            probe_timeout: portico_probe::DEFAULT_TIMEOUT,
            tick_policy: TickPolicy::default(),
            tls: TlsVerification::default(),
            link_label: crate::render::card::DEFAULT_LINK_LABEL.to_owned(),
            card_stagger: crate::render::card::DEFAULT_STAGGER,
            layout: PageLayout::default(),
        }
    }
}

impl PortalConfig {
    /// Card renderer for this page.
    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.link_label.clone()).with_stagger(self.card_stagger)
    }

    /// Transport settings for the probe client.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig::default()
            .with_timeout(self.probe_timeout)
            .with_tls(tls)
    }
}

// ── Health poller ──
//
// Sequential probing of every project that has a health endpoint. Each
// result is written to the registry before the next probe starts.

use std::sync::Arc;
use std::time::{Duration, Instant};

use portico_probe::{HealthClient, resolve_endpoint};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::PortalConfig;
use crate::error::CoreError;
use crate::model::{HealthCheck, ProbeReport, ProjectStatus, UnreachableCause};
use crate::store::Registry;

/// A project with a configured endpoint.
#[derive(Debug, Clone)]
pub struct ProbeTarget {
    pub id: String,
    /// Endpoint as configured.
    pub endpoint: String,
    /// Resolved URL, or why resolution failed.
    pub url: Result<Url, UnreachableCause>,
}

impl ProbeTarget {
    fn display_url(&self) -> String {
        self.url
            .as_ref()
            .map_or_else(|_| self.endpoint.clone(), ToString::to_string)
    }
}

/// Tally of one poll cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub checked: usize,
    pub online: usize,
    pub offline: usize,
    pub elapsed: Duration,
}

impl PollSummary {
    fn record(&mut self, status: ProjectStatus) {
        self.checked += 1;
        if status.is_online() {
            self.online += 1;
        } else {
            self.offline += 1;
        }
    }
}

/// Probes project health endpoints and writes the results to the registry.
///
/// The only writer of project status after start-up.
pub struct HealthPoller {
    registry: Arc<Registry>,
    client: HealthClient,
    targets: Vec<ProbeTarget>,
}

impl HealthPoller {
    /// Build a poller for every project in `registry` that has an endpoint.
    ///
    /// Endpoints are resolved once, in registry order. One that fails to
    /// resolve stays in the target list and always reports unreachable.
    pub fn new(registry: Arc<Registry>, client: HealthClient, base_url: Option<&Url>) -> Self {
        let targets = registry
            .snapshot()
            .iter()
            .filter_map(|project| {
                let endpoint = registry.endpoint(&project.id)?;
                let url = resolve_endpoint(base_url, endpoint).map_err(|e| {
                    warn!(project = %project.id, endpoint, error = %e, "unresolvable health endpoint");
                    UnreachableCause::from(e)
                });
                Some(ProbeTarget {
                    id: project.id.clone(),
                    endpoint: endpoint.to_owned(),
                    url,
                })
            })
            .collect();

        Self {
            registry,
            client,
            targets,
        }
    }

    /// Build the probe client from `config` and wrap `registry`.
    pub fn from_config(registry: Arc<Registry>, config: &PortalConfig) -> Result<Self, CoreError> {
        let client = HealthClient::new(&config.transport())?;
        Ok(Self::new(registry, client, config.base_url.as_ref()))
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Projects that will be probed, in order.
    pub fn targets(&self) -> &[ProbeTarget] {
        &self.targets
    }

    /// Probe a single target.
    pub async fn check(&self, target: &ProbeTarget) -> HealthCheck {
        match &target.url {
            Ok(url) => self.client.probe(url).await.into(),
            Err(cause) => HealthCheck::Unreachable(cause.clone()),
        }
    }

    /// Run one poll cycle.
    ///
    /// Targets are probed one at a time in registry order. After each
    /// probe the project's status is written and `on_update` runs before
    /// the next probe starts.
    pub async fn poll_once<F>(&self, mut on_update: F) -> PollSummary
    where
        F: FnMut(&Registry),
    {
        let started = Instant::now();
        let mut summary = PollSummary::default();

        for target in &self.targets {
            let check = self.check(target).await;
            match &check {
                HealthCheck::Ok { status, latency } => {
                    debug!(project = %target.id, status, ?latency, "project healthy");
                }
                HealthCheck::Unreachable(cause) => {
                    debug!(project = %target.id, %cause, "project unreachable");
                }
            }

            let status = check.project_status();
            self.registry.set_status(&target.id, status);
            on_update(&self.registry);
            summary.record(status);
        }

        summary.elapsed = started.elapsed();
        info!(
            checked = summary.checked,
            online = summary.online,
            offline = summary.offline,
            elapsed = ?summary.elapsed,
            "poll cycle complete"
        );
        summary
    }

    /// Probe every target without touching the registry.
    pub async fn probe_all(&self) -> Vec<ProbeReport> {
        let mut reports = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let check = self.check(target).await;
            let name = self
                .registry
                .get(&target.id)
                .map_or_else(|| target.id.clone(), |p| p.name.clone());
            reports.push(ProbeReport {
                id: target.id.clone(),
                name,
                url: target.display_url(),
                check,
            });
        }
        reports
    }
}

// ── Portal lifecycle ──
//
// Wires the registry, renderer, poller, and stat animator to a render
// target. Owns the background tasks and stops them on shutdown.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::animate;
use crate::config::{PortalConfig, TickPolicy};
use crate::error::CoreError;
use crate::model::ProbeReport;
use crate::poller::{HealthPoller, PollSummary};
use crate::render::{RenderTarget, Renderer, SharedTarget, lock};
use crate::store::Registry;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<PortalInner>`. Construction renders
/// nothing and starts nothing; call [`start()`](Self::start).
pub struct Portal<T: RenderTarget + 'static> {
    inner: Arc<PortalInner<T>>,
}

impl<T: RenderTarget + 'static> Clone for Portal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct PortalInner<T> {
    config: PortalConfig,
    registry: Arc<Registry>,
    poller: HealthPoller,
    renderer: Renderer,
    target: SharedTarget<T>,
    cancel: CancellationToken,
    task_handles: tokio::sync::Mutex<Vec<JoinHandle<()>>>,
}

impl<T: RenderTarget + 'static> Portal<T> {
    /// Build a portal that owns `target`.
    pub fn new(config: PortalConfig, target: T) -> Result<Self, CoreError> {
        Self::with_shared_target(config, Arc::new(Mutex::new(target)))
    }

    /// Build a portal over a target the caller also holds.
    pub fn with_shared_target(
        config: PortalConfig,
        target: SharedTarget<T>,
    ) -> Result<Self, CoreError> {
        let registry = Arc::new(Registry::new(
            config.projects.clone(),
            config.health_endpoints.clone(),
        )?);
        let poller = HealthPoller::from_config(Arc::clone(&registry), &config)?;
        let renderer = config.renderer();

        Ok(Self {
            inner: Arc::new(PortalInner {
                config,
                registry,
                poller,
                renderer,
                target,
                cancel: CancellationToken::new(),
                task_handles: tokio::sync::Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.inner.registry
    }

    pub fn poller(&self) -> &HealthPoller {
        &self.inner.poller
    }

    pub fn target(&self) -> &SharedTarget<T> {
        &self.inner.target
    }

    /// Token cancelled by [`shutdown()`](Self::shutdown).
    pub fn cancel_token(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Render the configured statuses, kick off the stat animation, and
    /// start periodic polling. The first poll cycle begins immediately.
    ///
    /// Calling `start` on a running portal does nothing.
    pub async fn start(&self) {
        let mut handles = self.inner.task_handles.lock().await;
        if !handles.is_empty() {
            debug!("portal already started");
            return;
        }

        self.render();
        handles.extend(animate::present_stats(
            &self.inner.target,
            &self.inner.config.stats,
        ));

        let cfg = &self.inner.config;
        info!(
            projects = self.inner.registry.len(),
            probed = self.inner.poller.targets().len(),
            interval = ?cfg.poll_interval,
            policy = %cfg.tick_policy,
            "portal started"
        );
        handles.push(tokio::spawn(poll_task(
            self.clone(),
            cfg.poll_interval,
            cfg.tick_policy,
            self.inner.cancel.clone(),
        )));
    }

    /// Stop polling and wait for every background task to finish,
    /// including in-flight overlapping poll cycles.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("portal stopped");
    }

    // ── Operations ───────────────────────────────────────────────

    /// Re-render the project grid from the registry.
    pub fn render(&self) -> bool {
        let snapshot = self.inner.registry.snapshot();
        self.inner
            .renderer
            .render(&mut *lock(&self.inner.target), &snapshot)
    }

    /// One poll cycle, re-rendering after every probe.
    pub async fn poll_once(&self) -> PollSummary {
        self.inner.poller.poll_once(|_| self.render_quiet()).await
    }

    /// Probe every endpoint without touching the registry or the page.
    pub async fn probe_all(&self) -> Vec<ProbeReport> {
        self.inner.poller.probe_all().await
    }

    fn render_quiet(&self) {
        if !self.render() {
            warn!("render target has no projects container");
        }
    }
}

/// Poll on a fixed interval until `cancel` fires.
///
/// Overlapping cycles are tracked so that the task only returns once
/// every cycle it started has stopped touching the target.
async fn poll_task<T: RenderTarget + 'static>(
    portal: Portal<T>,
    period: Duration,
    policy: TickPolicy,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    if policy == TickPolicy::Skip {
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    }
    let mut cycles = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => match policy {
                TickPolicy::Skip => {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => break,
                        summary = portal.poll_once() => {
                            if summary.elapsed > period {
                                warn!(elapsed = ?summary.elapsed, ?period, "poll cycle overran interval");
                            }
                        }
                    }
                }
                TickPolicy::Overlap => {
                    while cycles.try_join_next().is_some() {}
                    if !cycles.is_empty() {
                        debug!(in_flight = cycles.len(), "starting overlapping poll cycle");
                    }

                    let portal = portal.clone();
                    let cancel = cancel.clone();
                    cycles.spawn(async move {
                        tokio::select! {
                            biased;
                            () = cancel.cancelled() => {}
                            _ = portal.poll_once() => {}
                        }
                    });
                }
            },
        }
    }

    while cycles.join_next().await.is_some() {}
}

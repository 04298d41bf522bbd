//! Health check command handler.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tabled::Tabled;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use portico_core::{HealthCheck, HealthPoller, ProbeReport, Registry, UnreachableCause};

use crate::cli::{CheckArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output::{self, Printer};

// ── Report types ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ServiceStatus {
    id: String,
    name: String,
    url: String,
    online: bool,
    http_status: Option<u16>,
    latency_ms: Option<u64>,
    error: Option<String>,
}

impl From<ProbeReport> for ServiceStatus {
    fn from(report: ProbeReport) -> Self {
        let http_status = match &report.check {
            HealthCheck::Ok { status, .. }
            | HealthCheck::Unreachable(UnreachableCause::HttpStatus(status)) => Some(*status),
            HealthCheck::Unreachable(_) => None,
        };
        let latency_ms = report
            .check
            .latency()
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));

        Self {
            online: report.check.is_ok(),
            error: report.check.cause().map(ToString::to_string),
            id: report.id,
            name: report.name,
            url: report.url,
            http_status,
            latency_ms,
        }
    }
}

#[derive(Debug, Serialize)]
struct CheckReport {
    timestamp: String,
    all_healthy: bool,
    services: Vec<ServiceStatus>,
}

impl CheckReport {
    fn unreachable(&self) -> usize {
        self.services.iter().filter(|s| !s.online).count()
    }
}

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Project")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Latency")]
    latency: String,
    #[tabled(rename = "Error")]
    error: String,
}

// ── Rendering ───────────────────────────────────────────────────────

fn detail(report: &CheckReport, printer: &Printer) -> String {
    let rows: Vec<ServiceRow> = report
        .services
        .iter()
        .map(|s| ServiceRow {
            name: s.name.clone(),
            url: s.url.clone(),
            status: printer.badge(if s.online { "ONLINE" } else { "OFFLINE" }, s.online),
            latency: s.latency_ms.map(|ms| format!("{ms}ms")).unwrap_or_default(),
            error: s.error.clone().unwrap_or_default(),
        })
        .collect();

    let summary = if report.services.is_empty() {
        "No health endpoints configured".to_owned()
    } else if report.all_healthy {
        printer.badge("All services are healthy!", true)
    } else {
        printer.badge("Some services are down!", false)
    };

    format!("{}\n{summary}", output::table(rows))
}

fn plain(report: &CheckReport) -> String {
    report
        .services
        .iter()
        .map(|s| format!("{}\t{}", s.id, if s.online { "online" } else { "offline" }))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

async fn run_once(poller: &HealthPoller) -> CheckReport {
    let services: Vec<ServiceStatus> = poller
        .probe_all()
        .await
        .into_iter()
        .map(ServiceStatus::from)
        .collect();

    CheckReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        all_healthy: services.iter().all(|s| s.online),
        services,
    }
}

fn print_report(report: &CheckReport, printer: &Printer) {
    printer.emit(&printer.document(report, |r| detail(r, printer), plain));
}

pub async fn handle(args: CheckArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (_, portal) = config::load_portal_config(global)?;
    let registry = Arc::new(Registry::new(
        portal.projects.clone(),
        portal.health_endpoints.clone(),
    )?);
    let poller = HealthPoller::from_config(registry, &portal)?;
    let printer = Printer::new(global);

    let Some(secs) = args.watch.filter(|s| *s > 0) else {
        let report = run_once(&poller).await;
        print_report(&report, &printer);
        if report.all_healthy {
            return Ok(());
        }
        return Err(CliError::Unhealthy {
            unreachable: report.unreachable(),
            total: report.services.len(),
        });
    };

    if !global.quiet {
        eprintln!("Monitoring services every {secs} seconds... (Press Ctrl+C to stop)");
    }

    let mut interval = tokio::time::interval(Duration::from_secs(secs));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            biased;
            _ = &mut ctrl_c => break,
            _ = interval.tick() => {
                let report = run_once(&poller).await;
                debug!(unreachable = report.unreachable(), "check complete");
                print_report(&report, &printer);
            }
        }
    }

    if !global.quiet {
        eprintln!("Health check stopped by user");
    }
    Ok(())
}

#![allow(clippy::unwrap_used)]
// Integration tests for the poll/render cycle using wiremock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portico_core::render::PROJECTS_CONTAINER;
use portico_core::{
    AggregateStats, Page, PageLayout, Portal, PortalConfig, ProjectDescriptor, ProjectMetadata,
    ProjectStatus, Registry, RenderTarget, Renderer, TickPolicy, lock,
};

// ── Helpers ─────────────────────────────────────────────────────────

/// Keeps every projects-container write.
#[derive(Default)]
struct Recorder {
    renders: Vec<String>,
}

impl RenderTarget for Recorder {
    fn has_region(&self, id: &str) -> bool {
        id == PROJECTS_CONTAINER
    }

    fn set_html(&mut self, id: &str, html: String) -> bool {
        if id != PROJECTS_CONTAINER {
            return false;
        }
        self.renders.push(html);
        true
    }
}

fn project(id: &str, status: ProjectStatus) -> ProjectDescriptor {
    ProjectDescriptor {
        id: id.into(),
        name: format!("Project {id}"),
        icon: "📰".into(),
        description: String::new(),
        path: format!("/{id}/"),
        port: None,
        status,
        tags: Vec::new(),
        metadata: ProjectMetadata::default(),
    }
}

fn config(
    server: &MockServer,
    projects: Vec<ProjectDescriptor>,
    endpoints: &[(&str, &str)],
) -> PortalConfig {
    PortalConfig {
        projects,
        health_endpoints: endpoints
            .iter()
            .map(|(id, ep)| ((*id).to_owned(), (*ep).to_owned()))
            .collect::<IndexMap<_, _>>(),
        base_url: Some(Url::parse(&server.uri()).unwrap()),
        probe_timeout: Duration::from_millis(500),
        ..PortalConfig::default()
    }
}

async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// An address nothing listens on.
fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/health")
}

fn card_status(html: &str, id: &str) -> Option<String> {
    let start = html.find(&format!(r#"data-project="{id}""#))?;
    let rest = &html[start..];
    let attr = r#"data-status=""#;
    let from = rest.find(attr)? + attr.len();
    let to = rest[from..].find('"')? + from;
    Some(rest[from..to].to_owned())
}

// ── Poll cycle ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_poll_once_checks_sequentially_and_renders_after_each() {
    let server = MockServer::start().await;
    for id in ["a", "b", "c"] {
        mount_status(&server, &format!("/{id}/health"), 200).await;
    }

    let cfg = config(
        &server,
        vec![
            project("a", ProjectStatus::Offline),
            project("b", ProjectStatus::Offline),
            project("c", ProjectStatus::Offline),
        ],
        &[("a", "/a/health"), ("b", "/b/health"), ("c", "/c/health")],
    );
    let portal = Portal::new(cfg, Recorder::default()).unwrap();

    let summary = portal.poll_once().await;
    assert_eq!(summary.checked, 3);
    assert_eq!(summary.online, 3);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);

    let renders = lock(portal.target()).renders.clone();
    assert_eq!(renders.len(), 3);

    let expected = [
        ["online", "offline", "offline"],
        ["online", "online", "offline"],
        ["online", "online", "online"],
    ];
    for (html, row) in renders.iter().zip(expected) {
        for (id, want) in ["a", "b", "c"].into_iter().zip(row) {
            assert_eq!(card_status(html, id).as_deref(), Some(want), "{id}");
        }
    }
}

#[tokio::test]
async fn test_project_without_endpoint_is_never_changed() {
    let server = MockServer::start().await;
    mount_status(&server, "/a/health", 200).await;

    let cfg = config(
        &server,
        vec![
            project("a", ProjectStatus::Offline),
            project("docs", ProjectStatus::Maintenance),
        ],
        &[("a", "/a/health")],
    );
    let portal = Portal::new(cfg, Recorder::default()).unwrap();

    for cycle in 0..5 {
        let summary = portal.poll_once().await;
        assert_eq!(summary.checked, 1, "cycle {cycle}");
        assert_eq!(
            portal.registry().status("docs"),
            Some(ProjectStatus::Maintenance),
            "cycle {cycle}"
        );
    }
    assert_eq!(portal.registry().status("a"), Some(ProjectStatus::Online));
    assert_eq!(server.received_requests().await.unwrap().len(), 5);

    let renders = lock(portal.target()).renders.clone();
    assert_eq!(renders.len(), 5);
    for html in &renders {
        assert_eq!(card_status(html, "docs").as_deref(), Some("maintenance"));
    }
}

#[tokio::test]
async fn test_unknown_endpoint_mapping_is_ignored() {
    let server = MockServer::start().await;
    mount_status(&server, "/a/health", 200).await;

    let cfg = config(
        &server,
        vec![project("a", ProjectStatus::Offline)],
        &[("a", "/a/health"), ("ghost", "/ghost/health")],
    );
    let portal = Portal::new(cfg, Recorder::default()).unwrap();

    assert_eq!(portal.poller().targets().len(), 1);
    portal.poll_once().await;
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failures_converge_to_offline() {
    let server = MockServer::start().await;
    mount_status(&server, "/err/health", 500).await;
    mount_status(&server, "/gone/health", 404).await;
    Mock::given(method("GET"))
        .and(path("/slow/health"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    let refused = refused_url();

    let cfg = config(
        &server,
        vec![
            project("err", ProjectStatus::Online),
            project("gone", ProjectStatus::Online),
            project("slow", ProjectStatus::Online),
            project("down", ProjectStatus::Online),
        ],
        &[
            ("err", "/err/health"),
            ("gone", "/gone/health"),
            ("slow", "/slow/health"),
            ("down", refused.as_str()),
        ],
    );
    let portal = Portal::new(cfg, Recorder::default()).unwrap();

    let summary = portal.poll_once().await;
    assert_eq!(summary.offline, 4);
    for id in ["err", "gone", "slow", "down"] {
        assert_eq!(
            portal.registry().status(id),
            Some(ProjectStatus::Offline),
            "{id}"
        );
    }
}

#[tokio::test]
async fn test_recovery_flips_back_online() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/health"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_status(&server, "/a/health", 200).await;

    let cfg = config(
        &server,
        vec![project("a", ProjectStatus::Online)],
        &[("a", "/a/health")],
    );
    let portal = Portal::new(cfg, Recorder::default()).unwrap();

    portal.poll_once().await;
    assert_eq!(portal.registry().status("a"), Some(ProjectStatus::Offline));
    portal.poll_once().await;
    assert_eq!(portal.registry().status("a"), Some(ProjectStatus::Online));
}

#[tokio::test]
async fn test_probe_all_leaves_registry_alone() {
    let server = MockServer::start().await;
    mount_status(&server, "/a/health", 500).await;

    let cfg = config(
        &server,
        vec![project("a", ProjectStatus::Online)],
        &[("a", "/a/health")],
    );
    let portal = Portal::new(cfg, Recorder::default()).unwrap();

    let reports = portal.probe_all().await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].name, "Project a");
    assert!(!reports[0].check.is_ok());
    assert_eq!(portal.registry().status("a"), Some(ProjectStatus::Online));
    assert!(lock(portal.target()).renders.is_empty());
}

// ── Registry → render ───────────────────────────────────────────────

#[test]
fn test_set_status_then_render_shows_each_status() {
    let registry = Registry::new(
        vec![project("a", ProjectStatus::Online)],
        IndexMap::new(),
    )
    .unwrap();
    let renderer = Renderer::default();
    let mut page = Page::new(PageLayout::default());

    let cases = [
        (ProjectStatus::Offline, "OFFLINE", true),
        (ProjectStatus::Maintenance, "OFFLINE", true),
        (ProjectStatus::Online, "ONLINE", false),
    ];
    for (status, label, inert) in cases {
        assert!(registry.set_status("a", status));
        assert!(renderer.render(&mut page, &registry.snapshot()));

        let html = page.region(PROJECTS_CONTAINER).unwrap();
        assert_eq!(
            card_status(html, "a").as_deref(),
            Some(status.to_string().as_str())
        );
        assert!(html.contains(&format!("<span>{label}</span>")), "{status}");
        assert_eq!(html.contains(r#"aria-disabled="true""#), inert, "{status}");
        assert_eq!(html.contains("pointer-events: none"), inert, "{status}");
    }
}

// ── Periodic polling ────────────────────────────────────────────────

fn timed_config(
    server: &MockServer,
    interval: Duration,
    policy: TickPolicy,
) -> PortalConfig {
    PortalConfig {
        poll_interval: interval,
        probe_timeout: Duration::from_secs(2),
        tick_policy: policy,
        ..config(
            server,
            vec![project("a", ProjectStatus::Offline)],
            &[("a", "/a/health")],
        )
    }
}

async fn mount_delayed(server: &MockServer, route: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_delay(delay))
        .mount(server)
        .await;
}

/// Run a started portal for `window`, shut it down, and count the
/// health requests the server saw.
async fn requests_during(server: &MockServer, cfg: PortalConfig, window: Duration) -> usize {
    let portal = Portal::new(cfg, Recorder::default()).unwrap();
    portal.start().await;
    tokio::time::sleep(window).await;
    portal.shutdown().await;
    server.received_requests().await.unwrap().len()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_start_polls_immediately_then_every_interval() {
    let server = MockServer::start().await;
    mount_status(&server, "/a/health", 200).await;

    // Ticks at 0, 200, ..., 1000ms.
    let cfg = timed_config(&server, Duration::from_millis(200), TickPolicy::Skip);
    let seen = requests_during(&server, cfg, Duration::from_millis(1050)).await;
    assert!((5..=6).contains(&seen), "expected ~6 requests, saw {seen}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_skip_drops_ticks_while_overlap_does_not() {
    let interval = Duration::from_millis(200);
    let window = Duration::from_millis(1050);
    let delay = Duration::from_millis(500);

    let skip_server = MockServer::start().await;
    mount_delayed(&skip_server, "/a/health", delay).await;
    let skipped = requests_during(
        &skip_server,
        timed_config(&skip_server, interval, TickPolicy::Skip),
        window,
    )
    .await;

    let overlap_server = MockServer::start().await;
    mount_delayed(&overlap_server, "/a/health", delay).await;
    let overlapped = requests_during(
        &overlap_server,
        timed_config(&overlap_server, interval, TickPolicy::Overlap),
        window,
    )
    .await;

    // Skip: cycles start at ~0, 500, 1000ms. Overlap: every tick.
    assert!((2..=4).contains(&skipped), "skip saw {skipped}");
    assert!(overlapped >= 5, "overlap saw {overlapped}");
    assert!(skipped < overlapped);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_nothing_polls_or_renders_after_shutdown() {
    let server = MockServer::start().await;
    mount_delayed(&server, "/a/health", Duration::from_millis(300)).await;

    let cfg = timed_config(&server, Duration::from_millis(100), TickPolicy::Overlap);
    let portal = Portal::new(cfg, Recorder::default()).unwrap();
    portal.start().await;
    tokio::time::sleep(Duration::from_millis(450)).await;
    portal.shutdown().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let requests = server.received_requests().await.unwrap().len();
    let renders = lock(portal.target()).renders.len();
    assert!(requests > 0);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(server.received_requests().await.unwrap().len(), requests);
    assert_eq!(lock(portal.target()).renders.len(), renders);
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_start_renders_and_polls_until_shutdown() {
    let server = MockServer::start().await;
    mount_status(&server, "/a/health", 200).await;

    let mut cfg = config(
        &server,
        vec![
            project("a", ProjectStatus::Offline),
            project("b", ProjectStatus::Maintenance),
        ],
        &[("a", "/a/health")],
    );
    cfg.stats = AggregateStats {
        total_projects: 2,
        active_projects: 1,
        system_uptime: "99.5%".into(),
        data_processed: "12.5k".into(),
    };
    let page = Arc::new(Mutex::new(Page::new(PageLayout::default())));
    let portal = Portal::with_shared_target(cfg, Arc::clone(&page)).unwrap();

    let mut rx = portal.registry().subscribe();
    portal.start().await;

    {
        let html = lock(&page).to_html();
        assert_eq!(card_status(&html, "b").as_deref(), Some("maintenance"));
    }

    tokio::time::timeout(Duration::from_secs(5), async {
        while portal.registry().status("a") != Some(ProjectStatus::Online) {
            rx.changed().await.unwrap();
        }
    })
    .await
    .unwrap();

    portal.shutdown().await;
    assert!(portal.cancel_token().is_cancelled());

    let html = lock(&page).to_html();
    assert_eq!(card_status(&html, "a").as_deref(), Some("online"));
    assert!(html.contains(r#"id="stat-projects">1</span>"#));
    assert!(html.contains(r#"id="stat-data">12.5k</span>"#));
}

#[tokio::test]
async fn test_duplicate_projects_fail_construction() {
    let cfg = PortalConfig {
        projects: vec![
            project("a", ProjectStatus::Online),
            project("a", ProjectStatus::Online),
        ],
        ..PortalConfig::default()
    };
    assert!(Portal::new(cfg, Recorder::default()).is_err());
}

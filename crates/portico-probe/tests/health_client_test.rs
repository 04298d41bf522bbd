#![allow(clippy::unwrap_used)]
// Integration tests for `HealthClient` using wiremock.

use std::time::Duration;

use url::Url;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portico_probe::{Error, HealthClient, TransportConfig, resolve_endpoint};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(timeout: Duration) -> (MockServer, HealthClient) {
    let server = MockServer::start().await;
    let transport = TransportConfig::default().with_timeout(timeout);
    let client = HealthClient::new(&transport).unwrap();
    (server, client)
}

fn health_url(server: &MockServer) -> Url {
    let base = Url::parse(&server.uri()).unwrap();
    resolve_endpoint(Some(&base), "/solar_news/api/health").unwrap()
}

async fn mount_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/solar_news/api/health"))
        .respond_with(ResponseTemplate::new(status).set_body_string("ignored"))
        .mount(server)
        .await;
}

// ── Healthy ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_probe_ok() {
    let (server, client) = setup(Duration::from_secs(5)).await;
    mount_status(&server, 200).await;

    let response = client.probe(&health_url(&server)).await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_probe_sends_user_agent() {
    let (server, client) = setup(Duration::from_secs(5)).await;

    Mock::given(method("GET"))
        .and(path("/solar_news/api/health"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let response = client.probe(&health_url(&server)).await.unwrap();
    assert_eq!(response.status, 204);
}

// ── Unhealthy ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_probe_server_error() {
    let (server, client) = setup(Duration::from_secs(5)).await;
    mount_status(&server, 500).await;

    let err = client.probe(&health_url(&server)).await.unwrap_err();
    assert!(matches!(err, Error::Status { status: 500 }), "got {err:?}");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_probe_not_found() {
    let (server, client) = setup(Duration::from_secs(5)).await;
    // No mock mounted: wiremock answers 404.

    let err = client.probe(&health_url(&server)).await.unwrap_err();
    assert!(matches!(err, Error::Status { status: 404 }), "got {err:?}");
}

#[tokio::test]
async fn test_probe_connection_refused() {
    let (_server, client) = setup(Duration::from_secs(5)).await;

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("http://{addr}/api/health")).unwrap();
    let err = client.probe(&url).await.unwrap_err();
    assert!(err.is_connect(), "expected connect error, got {err:?}");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_probe_times_out() {
    let (server, client) = setup(Duration::from_millis(200)).await;

    Mock::given(method("GET"))
        .and(path("/solar_news/api/health"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let err = client.probe(&health_url(&server)).await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert!(started.elapsed() < Duration::from_secs(2));
}

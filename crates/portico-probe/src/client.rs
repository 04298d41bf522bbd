// Health probe HTTP client
//
// One GET per probe, body ignored. Only the status classification and the
// round-trip latency survive into the result.

use std::time::{Duration, Instant};

use tracing::trace;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Successful probe result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResponse {
    /// Final HTTP status (after reqwest follows redirects).
    pub status: u16,
    /// Time from request start to response headers.
    pub latency: Duration,
}

/// HTTP client for sub-project health endpoints.
///
/// Cheap to clone; the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct HealthClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl HealthClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            timeout: transport.timeout,
        })
    }

    /// Issue a single GET against `url`.
    ///
    /// 2xx and 3xx are healthy. Any other status is `Error::Status`; any
    /// transport failure or an expired deadline is returned as-is. The
    /// deadline drops the in-flight request future, cancelling it.
    pub async fn probe(&self, url: &Url) -> Result<ProbeResponse, Error> {
        let started = Instant::now();
        let request = self.http.get(url.clone()).send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| Error::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            })??;

        let latency = started.elapsed();
        let status = response.status();
        trace!(%url, status = status.as_u16(), ?latency, "probe response");

        if status.is_success() || status.is_redirection() {
            Ok(ProbeResponse {
                status: status.as_u16(),
                latency,
            })
        } else {
            Err(Error::Status {
                status: status.as_u16(),
            })
        }
    }
}

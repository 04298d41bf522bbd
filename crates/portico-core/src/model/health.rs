// ── Health check outcomes ──
//
// The poller keeps the cause of a failed probe; the registry and the
// rendered page only ever see online/offline.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::project::ProjectStatus;

/// Why a project was considered unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum UnreachableCause {
    /// The endpoint answered with a non-success status.
    HttpStatus(u16),
    /// No answer within the probe timeout.
    Timeout,
    /// Connection refused, DNS failure, TLS handshake failure.
    Connect(String),
    /// Any other transport failure.
    Request(String),
    /// The configured endpoint could not be resolved to a URL.
    InvalidEndpoint(String),
}

impl fmt::Display for UnreachableCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus(code) => write!(f, "HTTP {code}"),
            Self::Timeout => f.write_str("timed out"),
            Self::Connect(reason) => write!(f, "connection error: {reason}"),
            Self::Request(reason) => write!(f, "request failed: {reason}"),
            Self::InvalidEndpoint(reason) => write!(f, "invalid endpoint: {reason}"),
        }
    }
}

impl From<portico_probe::Error> for UnreachableCause {
    fn from(err: portico_probe::Error) -> Self {
        use portico_probe::Error;

        if err.is_timeout() {
            return Self::Timeout;
        }
        if let Some(status) = err.status() {
            return Self::HttpStatus(status);
        }
        match &err {
            Error::Transport(e) if e.is_connect() => Self::Connect(e.to_string()),
            Error::InvalidUrl(_) | Error::MissingBaseUrl { .. } => {
                Self::InvalidEndpoint(err.to_string())
            }
            _ => Self::Request(err.to_string()),
        }
    }
}

/// Result of probing one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthCheck {
    Ok { status: u16, latency: Duration },
    Unreachable(UnreachableCause),
}

impl HealthCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// Collapse into the status shown on the page.
    pub fn project_status(&self) -> ProjectStatus {
        if self.is_ok() {
            ProjectStatus::Online
        } else {
            ProjectStatus::Offline
        }
    }

    pub fn latency(&self) -> Option<Duration> {
        match self {
            Self::Ok { latency, .. } => Some(*latency),
            Self::Unreachable(_) => None,
        }
    }

    pub fn cause(&self) -> Option<&UnreachableCause> {
        match self {
            Self::Ok { .. } => None,
            Self::Unreachable(cause) => Some(cause),
        }
    }
}

impl From<Result<portico_probe::ProbeResponse, portico_probe::Error>> for HealthCheck {
    fn from(result: Result<portico_probe::ProbeResponse, portico_probe::Error>) -> Self {
        match result {
            Ok(response) => Self::Ok {
                status: response.status,
                latency: response.latency,
            },
            Err(e) => Self::Unreachable(e.into()),
        }
    }
}

/// One row of a probe pass, as reported by `check`.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub id: String,
    pub name: String,
    /// Resolved URL, or the raw configured endpoint if it did not resolve.
    pub url: String,
    pub check: HealthCheck,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_failure_collapses_to_offline() {
        let causes = [
            UnreachableCause::HttpStatus(500),
            UnreachableCause::HttpStatus(404),
            UnreachableCause::Timeout,
            UnreachableCause::Connect("refused".into()),
        ];
        for cause in causes {
            assert_eq!(
                HealthCheck::Unreachable(cause).project_status(),
                ProjectStatus::Offline
            );
        }
    }

    #[test]
    fn probe_errors_map_to_causes() {
        let cause: UnreachableCause = portico_probe::Error::Status { status: 503 }.into();
        assert_eq!(cause, UnreachableCause::HttpStatus(503));

        let cause: UnreachableCause = portico_probe::Error::Timeout { timeout_ms: 5000 }.into();
        assert_eq!(cause, UnreachableCause::Timeout);

        let cause: UnreachableCause = portico_probe::Error::MissingBaseUrl {
            endpoint: "/x".into(),
        }
        .into();
        assert!(matches!(cause, UnreachableCause::InvalidEndpoint(_)));
    }

    #[test]
    fn ok_check_is_online() {
        let check = HealthCheck::Ok {
            status: 200,
            latency: Duration::from_millis(12),
        };
        assert_eq!(check.project_status(), ProjectStatus::Online);
        assert_eq!(check.latency(), Some(Duration::from_millis(12)));
        assert!(check.cause().is_none());
    }
}

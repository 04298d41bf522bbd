use thiserror::Error;

/// Top-level error type for the `portico-probe` crate.
///
/// Every way a health probe can fail lands here. `portico-core` folds all
/// of them into a single "unreachable" outcome, but keeps the variant around
/// for logging and the `check` report.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, reset, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Endpoint could not be turned into a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Relative endpoint with no base URL to resolve it against.
    #[error("Relative endpoint '{endpoint}' requires a base URL")]
    MissingBaseUrl { endpoint: String },

    /// Request did not complete within the probe timeout.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// TLS setup error (unreadable or invalid CA certificate).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Response ────────────────────────────────────────────────────
    /// The endpoint answered with a non-success status.
    #[error("Unhealthy response: HTTP {status}")]
    Status { status: u16 },
}

impl Error {
    /// Returns `true` if the probe gave up waiting, either on our own
    /// deadline or on reqwest's.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the TCP/TLS connection could not be established.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }

    /// The HTTP status the endpoint answered with, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

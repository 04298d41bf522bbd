//! Async HTTP health probing for portico.
//!
//! - **[`HealthClient`]** issues a single bounded GET per probe and
//!   classifies the answer: 2xx/3xx is healthy, everything else is an
//!   [`Error`].
//! - **[`TransportConfig`]** builds the underlying `reqwest::Client`
//!   (TLS mode, timeout, user agent).
//! - **[`resolve_endpoint`]** turns configured endpoint strings, absolute
//!   or origin-relative, into URLs.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod transport;

pub use client::{HealthClient, ProbeResponse};
pub use endpoint::resolve_endpoint;
pub use error::Error;
pub use transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};

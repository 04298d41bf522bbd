//! Project registry, rendering, and health polling for the portico landing page.
//!
//! - **[`Portal`]**: facade that wires everything to a [`RenderTarget`].
//!   [`start()`](Portal::start) renders the configured statuses, plays the
//!   stat count-up, and spawns the periodic poll task.
//!
//! - **[`Registry`]**: ordered project descriptors plus the id to health
//!   endpoint map. Status writes publish a fresh snapshot through a
//!   `tokio::sync::watch` channel.
//!
//! - **[`Renderer`]**: turns a registry snapshot into project cards. Output
//!   depends only on the snapshot.
//!
//! - **[`HealthPoller`]**: probes every endpoint one at a time and writes
//!   `online` or `offline` back to the registry after each probe.
//!
//! - **[`animate`]**: cosmetic count-up for the hero stats.
//!
//! - **[`Page`]**: the static HTML document, kept on disk by
//!   [`spawn_page_writer`].

pub mod animate;
pub mod config;
pub mod error;
pub mod model;
pub mod poller;
pub mod portal;
pub mod render;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{PortalConfig, TickPolicy, TlsVerification};
pub use error::CoreError;
pub use poller::{HealthPoller, PollSummary, ProbeTarget};
pub use portal::Portal;
pub use render::{
    Page, PageLayout, RenderTarget, Renderer, SharedTarget, lock, spawn_page_writer, write_html,
};
pub use store::{ProjectSnapshot, Registry};

pub use model::{
    AggregateStats, HealthCheck, ProbeReport, ProjectDescriptor, ProjectMetadata, ProjectStatus,
    UnreachableCause,
};

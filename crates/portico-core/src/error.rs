// ── Core error types ──
//
// Errors that can stop a portal from being built. Probe failures during
// polling are never surfaced here; they become `offline` statuses.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Registry ─────────────────────────────────────────────────────
    #[error("Duplicate project id: {id}")]
    DuplicateProject { id: String },

    // ── Transport setup ──────────────────────────────────────────────
    #[error("Failed to set up health probe client: {0}")]
    Probe(#[from] portico_probe::Error),

    // ── Output ───────────────────────────────────────────────────────
    #[error("Failed to write page to {path}: {source}")]
    PageWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

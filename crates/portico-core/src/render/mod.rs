//! Rendering: project cards, stat regions, and the page they land in.
//!
//! Output goes to a [`RenderTarget`], a set of regions addressed by stable
//! ids. Writing to a region the target does not have is a silent no-op,
//! so a page without a stats section simply never shows stats.

pub mod card;
pub mod page;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use card::Renderer;
pub use page::{Page, PageLayout, spawn_page_writer, write_html};

/// Region holding the project cards.
pub const PROJECTS_CONTAINER: &str = "projects-container";
/// Region holding the active-project counter.
pub const STAT_PROJECTS: &str = "stat-projects";
/// Region holding the platform uptime figure.
pub const STAT_UPTIME: &str = "stat-uptime";
/// Region holding the data-processed figure.
pub const STAT_DATA: &str = "stat-data";

/// Addressable output regions.
pub trait RenderTarget: Send {
    fn has_region(&self, id: &str) -> bool;

    /// Replace the inner HTML of region `id`. Returns `false` if absent.
    fn set_html(&mut self, id: &str, html: String) -> bool;

    /// Replace region `id` with escaped plain text. Returns `false` if absent.
    fn set_text(&mut self, id: &str, text: &str) -> bool {
        let mut html = String::with_capacity(text.len());
        escape_into(&mut html, text);
        self.set_html(id, html)
    }
}

/// A render target shared between the renderer, the animator, and the
/// page writer. Never held across an `.await`.
pub type SharedTarget<T> = Arc<Mutex<T>>;

/// Lock a shared target, recovering from a poisoned mutex.
pub fn lock<T>(target: &Mutex<T>) -> MutexGuard<'_, T> {
    target.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Append `text` to `out` with HTML metacharacters escaped.
pub(crate) fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text);
    out
}

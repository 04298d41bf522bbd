// ── Static landing page ──
//
// In-memory document with addressable regions. Every effective mutation
// bumps a `watch` version; the page writer task turns versions into file
// writes, so bursts (animation frames, a full poll cycle) coalesce.

use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{
    PROJECTS_CONTAINER, RenderTarget, STAT_DATA, STAT_PROJECTS, STAT_UPTIME, SharedTarget,
    escape, lock,
};
use crate::error::CoreError;

const STYLESHEET: &str = r"
:root { --bg: #0f1419; --card: #1a2029; --text: #e6e8eb; --muted: #9ba3b4; --accent: #ff9500; --ok: #00d4aa; --down: #ff4d4f; }
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, -apple-system, sans-serif; background: var(--bg); color: var(--text); }
header { padding: 3rem 1.5rem 1rem; text-align: center; }
header h1 { margin: 0; color: var(--accent); }
header p { color: var(--muted); }
.stats { display: flex; justify-content: center; gap: 2rem; padding: 1rem; }
.stat { display: flex; flex-direction: column; align-items: center; }
.stat-value { font-size: 2rem; font-weight: 700; color: var(--ok); }
.stat-label { color: var(--muted); font-size: 0.85rem; }
#projects-container { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 1.5rem; padding: 1.5rem; max-width: 1200px; margin: 0 auto; }
.project-card { background: var(--card); border-radius: 12px; padding: 1.5rem; opacity: 0; animation: fade-in-up 0.5s ease forwards; }
.project-header { display: flex; justify-content: space-between; align-items: center; }
.project-icon { font-size: 2rem; }
.project-status { display: flex; align-items: center; gap: 0.4rem; color: var(--ok); font-size: 0.8rem; }
.project-status.offline { color: var(--down); }
.project-status-dot { width: 8px; height: 8px; border-radius: 50%; background: currentColor; }
.project-description { color: var(--muted); }
.project-meta { display: flex; gap: 1rem; font-size: 0.8rem; color: var(--muted); }
.meta-item { display: flex; gap: 0.3rem; }
.project-tags { display: flex; flex-wrap: wrap; gap: 0.4rem; margin: 1rem 0; }
.project-tag { background: #252d38; border-radius: 4px; padding: 0.15rem 0.5rem; font-size: 0.75rem; }
.project-link { display: inline-flex; gap: 0.5rem; color: var(--accent); text-decoration: none; font-weight: 600; }
@keyframes fade-in-up { from { opacity: 0; transform: translateY(20px); } to { opacity: 1; transform: translateY(0); } }
";

/// Static parts of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    pub title: String,
    pub tagline: String,
    /// Emit a `<meta http-equiv="refresh">` so open browsers reload.
    pub auto_refresh: Option<Duration>,
    /// Include the stat regions.
    pub show_stats: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            title: "Projects".into(),
            tagline: String::new(),
            auto_refresh: None,
            show_stats: true,
        }
    }
}

/// The landing page document.
pub struct Page {
    layout: PageLayout,
    regions: IndexMap<String, String>,
    version: watch::Sender<u64>,
}

impl Page {
    pub fn new(layout: PageLayout) -> Self {
        let mut regions = IndexMap::new();
        if layout.show_stats {
            regions.insert(STAT_PROJECTS.to_owned(), "0".to_owned());
            regions.insert(STAT_UPTIME.to_owned(), "--".to_owned());
            regions.insert(STAT_DATA.to_owned(), "--".to_owned());
        }
        regions.insert(PROJECTS_CONTAINER.to_owned(), String::new());

        let (version, _) = watch::channel(0);
        Self {
            layout,
            regions,
            version,
        }
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Current inner HTML of region `id`.
    pub fn region(&self, id: &str) -> Option<&str> {
        self.regions.get(id).map(String::as_str)
    }

    /// Mutation counter; bumps on every content change.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        let title = escape(&self.layout.title);
        let mut out = String::with_capacity(8 * 1024);

        let _ = writeln!(out, "<!DOCTYPE html>");
        let _ = writeln!(out, r#"<html lang="en">"#);
        let _ = writeln!(out, "<head>");
        let _ = writeln!(out, r#"<meta charset="utf-8">"#);
        let _ = writeln!(
            out,
            r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#
        );
        if let Some(every) = self.layout.auto_refresh {
            let _ = writeln!(
                out,
                r#"<meta http-equiv="refresh" content="{}">"#,
                every.as_secs().max(1)
            );
        }
        let _ = writeln!(out, "<title>{title}</title>");
        let _ = writeln!(out, "<style>{STYLESHEET}</style>");
        let _ = writeln!(out, "</head>");
        let _ = writeln!(out, "<body>");

        let _ = writeln!(out, "<header>");
        let _ = writeln!(out, "<h1>{title}</h1>");
        if !self.layout.tagline.is_empty() {
            let _ = writeln!(out, "<p>{}</p>", escape(&self.layout.tagline));
        }
        let _ = writeln!(out, "</header>");

        let stats: Vec<_> = [
            (STAT_PROJECTS, "Active projects"),
            (STAT_UPTIME, "System uptime"),
            (STAT_DATA, "Data processed"),
        ]
        .into_iter()
        .filter_map(|(id, label)| self.region(id).map(|value| (id, label, value)))
        .collect();
        if !stats.is_empty() {
            let _ = writeln!(out, r#"<section class="stats">"#);
            for (id, label, value) in stats {
                let _ = writeln!(
                    out,
                    r#"<div class="stat"><span class="stat-value" id="{id}">{value}</span><span class="stat-label">{label}</span></div>"#
                );
            }
            let _ = writeln!(out, "</section>");
        }

        if let Some(cards) = self.region(PROJECTS_CONTAINER) {
            let _ = writeln!(out, r#"<main id="{PROJECTS_CONTAINER}">"#);
            out.push_str(cards);
            let _ = writeln!(out, "</main>");
        }

        let _ = writeln!(out, "</body>");
        let _ = writeln!(out, "</html>");
        out
    }
}

impl RenderTarget for Page {
    fn has_region(&self, id: &str) -> bool {
        self.regions.contains_key(id)
    }

    fn set_html(&mut self, id: &str, html: String) -> bool {
        let Some(slot) = self.regions.get_mut(id) else {
            return false;
        };
        if *slot != html {
            *slot = html;
            self.version.send_modify(|v| *v += 1);
        }
        true
    }
}

// ── Output ───────────────────────────────────────────────────────────

/// Write `html` to `path` via a sibling temp file and a rename.
pub async fn write_html(path: &Path, html: &str) -> Result<(), CoreError> {
    let io_err = |source| CoreError::PageWrite {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let file_name = path
        .file_name()
        .map_or_else(|| "index.html".into(), |n| n.to_string_lossy().into_owned());
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    tokio::fs::write(&tmp, html).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
    Ok(())
}

async fn flush(page: &SharedTarget<Page>, path: &Path) {
    let html = lock(page).to_html();
    match write_html(path, &html).await {
        Ok(()) => debug!(path = %path.display(), bytes = html.len(), "page written"),
        Err(e) => warn!(error = %e, "page write failed"),
    }
}

/// Keep `path` in sync with `page` until `cancel` fires.
///
/// Writes once on start, once per observed version change (intermediate
/// versions coalesce), and once more on shutdown.
pub fn spawn_page_writer(
    page: SharedTarget<Page>,
    path: PathBuf,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let mut rx = lock(&page).subscribe();

    tokio::spawn(async move {
        flush(&page, &path).await;

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    flush(&page, &path).await;
                }
            }
        }

        flush(&page, &path).await;
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn new_page_has_all_regions() {
        let page = Page::new(PageLayout::default());
        for id in [PROJECTS_CONTAINER, STAT_PROJECTS, STAT_UPTIME, STAT_DATA] {
            assert!(page.has_region(id), "{id}");
        }
    }

    #[test]
    fn stats_can_be_omitted() {
        let mut page = Page::new(PageLayout {
            show_stats: false,
            ..PageLayout::default()
        });
        assert!(!page.has_region(STAT_PROJECTS));
        assert!(!page.set_text(STAT_PROJECTS, "3"));
        assert_eq!(page.version(), 0);
        assert!(!page.to_html().contains(r#"class="stats""#));
    }

    #[test]
    fn version_bumps_only_on_change() {
        let mut page = Page::new(PageLayout::default());
        assert!(page.set_text(STAT_UPTIME, "99.5%"));
        assert_eq!(page.version(), 1);
        assert!(page.set_text(STAT_UPTIME, "99.5%"));
        assert_eq!(page.version(), 1);
    }

    #[test]
    fn html_contains_regions_and_layout() {
        let mut page = Page::new(PageLayout {
            title: "BUPT <EDU>".into(),
            tagline: "Data Intelligence Hub".into(),
            auto_refresh: Some(Duration::from_secs(30)),
            show_stats: true,
        });
        page.set_text(STAT_DATA, "12.5k");
        page.set_html(PROJECTS_CONTAINER, "<div>cards</div>".into());

        let html = page.to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>BUPT &lt;EDU&gt;</title>"));
        assert!(html.contains(r#"<meta http-equiv="refresh" content="30">"#));
        assert!(html.contains(r#"id="stat-data">12.5k</span>"#));
        assert!(html.contains(r#"<main id="projects-container">"#));
        assert!(html.contains("<div>cards</div>"));
    }

    #[tokio::test]
    async fn write_html_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public").join("index.html");
        write_html(&path, "<html></html>").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
        assert!(!dir.path().join("public").join(".index.html.tmp").exists());
    }

    #[tokio::test]
    async fn writer_follows_page_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        let page = Arc::new(Mutex::new(Page::new(PageLayout::default())));
        let cancel = CancellationToken::new();

        let handle = spawn_page_writer(Arc::clone(&page), path.clone(), cancel.clone());
        lock(&page).set_text(STAT_UPTIME, "42%");

        cancel.cancel();
        handle.await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#"id="stat-uptime">42%</span>"#));
    }
}

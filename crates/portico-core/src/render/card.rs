// ── Project card rendering ──
//
// One card per project, in registry order. Output depends only on the
// input slice, so repeated renders of an unchanged registry are identical.

use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

use super::{PROJECTS_CONTAINER, RenderTarget, escape};
use crate::model::ProjectDescriptor;

/// Default delay between consecutive cards' entrance animations.
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(100);

/// Default call-to-action text on each card.
pub const DEFAULT_LINK_LABEL: &str = "Open project";

const INERT_LINK_ATTRS: &str =
    r#" style="pointer-events: none; opacity: 0.5;" aria-disabled="true" tabindex="-1""#;

/// Renders the project grid into a [`RenderTarget`].
#[derive(Debug, Clone)]
pub struct Renderer {
    stagger: Duration,
    link_label: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            stagger: DEFAULT_STAGGER,
            link_label: DEFAULT_LINK_LABEL.to_owned(),
        }
    }
}

impl Renderer {
    pub fn new(link_label: impl Into<String>) -> Self {
        Self {
            link_label: link_label.into(),
            ..Self::default()
        }
    }

    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    /// Replace the projects container with one card per project.
    ///
    /// Returns `false` without touching the target if it has no
    /// projects container.
    pub fn render<T: RenderTarget + ?Sized>(
        &self,
        target: &mut T,
        projects: &[Arc<ProjectDescriptor>],
    ) -> bool {
        if !target.has_region(PROJECTS_CONTAINER) {
            return false;
        }

        let mut html = String::new();
        for (index, project) in projects.iter().enumerate() {
            self.write_card(&mut html, project, index);
        }
        target.set_html(PROJECTS_CONTAINER, html)
    }

    /// Render a single card.
    pub fn card(&self, project: &ProjectDescriptor, index: usize) -> String {
        let mut html = String::new();
        self.write_card(&mut html, project, index);
        html
    }

    fn delay_ms(&self, index: usize) -> u128 {
        let steps = u32::try_from(index).unwrap_or(u32::MAX);
        self.stagger.saturating_mul(steps).as_millis()
    }

    fn write_card(&self, out: &mut String, project: &ProjectDescriptor, index: usize) {
        let online = project.status.is_online();
        let status_class = if online {
            "project-status"
        } else {
            "project-status offline"
        };
        let link_attrs = if online { "" } else { INERT_LINK_ATTRS };
        let meta = &project.metadata;

        let _ = writeln!(
            out,
            r#"<div class="project-card" data-project="{id}" data-status="{status}" style="animation-delay: {delay}ms;">"#,
            id = escape(&project.id),
            status = project.status,
            delay = self.delay_ms(index),
        );
        let _ = writeln!(out, r#"  <div class="project-header">"#);
        let _ = writeln!(
            out,
            r#"    <span class="project-icon">{}</span>"#,
            escape(&project.icon)
        );
        let _ = writeln!(out, r#"    <div class="{status_class}">"#);
        let _ = writeln!(out, r#"      <span class="project-status-dot"></span>"#);
        let _ = writeln!(out, "      <span>{}</span>", project.status.label());
        let _ = writeln!(out, "    </div>");
        let _ = writeln!(out, "  </div>");
        let _ = writeln!(
            out,
            r#"  <h3 class="project-title">{}</h3>"#,
            escape(&project.name)
        );
        let _ = writeln!(
            out,
            r#"  <p class="project-description">{}</p>"#,
            escape(&project.description)
        );

        let _ = writeln!(out, r#"  <div class="project-meta">"#);
        for (glyph, value) in [
            ("📦", &meta.version),
            ("🔄", &meta.last_update),
            ("⚡", &meta.uptime),
        ] {
            let _ = writeln!(
                out,
                r#"    <div class="meta-item"><span>{glyph}</span><span>{}</span></div>"#,
                escape(value)
            );
        }
        let _ = writeln!(out, "  </div>");

        let _ = write!(out, r#"  <div class="project-tags">"#);
        for tag in &project.tags {
            let _ = write!(out, r#"<span class="project-tag">{}</span>"#, escape(tag));
        }
        let _ = writeln!(out, "</div>");

        let _ = writeln!(
            out,
            r#"  <a href="{href}" class="project-link"{link_attrs}>"#,
            href = escape(&project.path),
        );
        let _ = writeln!(
            out,
            "    <span>{}</span>\n    <span>→</span>",
            escape(&self.link_label)
        );
        let _ = writeln!(out, "  </a>");
        let _ = writeln!(out, "</div>");
    }
}

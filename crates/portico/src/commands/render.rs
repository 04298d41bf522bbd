//! One-shot page rendering.

use std::path::PathBuf;

use portico_core::animate::present_stats_now;
use portico_core::{Page, PortalConfig, Registry, write_html};

use crate::cli::{GlobalOpts, RenderArgs};
use crate::config;
use crate::error::CliError;

/// Build the page from configured statuses and final stat values.
pub fn build_page(portal: &PortalConfig) -> Result<Page, CliError> {
    let registry = Registry::new(portal.projects.clone(), portal.health_endpoints.clone())?;
    let mut page = Page::new(portal.layout.clone());

    portal.renderer().render(&mut page, &registry.snapshot());
    present_stats_now(&mut page, &portal.stats);
    Ok(page)
}

pub async fn handle(args: RenderArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (cfg, portal) = config::load_portal_config(global)?;
    let html = build_page(&portal)?.to_html();

    let out: Option<PathBuf> = args.out.or(cfg.site.output);
    match out {
        Some(path) => {
            write_html(&path, &html).await?;
            if !global.quiet {
                eprintln!("Wrote {} ({} projects)", path.display(), portal.projects.len());
            }
        }
        None => print!("{html}"),
    }
    Ok(())
}

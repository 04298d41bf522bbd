//! Long-running landing page: poll, re-render, rewrite until Ctrl-C.

use std::sync::{Arc, Mutex};

use tracing::info;

use portico_core::{Page, Portal, spawn_page_writer};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::config;
use crate::error::CliError;

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (cfg, mut portal_cfg) = config::load_portal_config(global)?;
    if let Some(interval) = args.interval {
        portal_cfg.poll_interval = interval;
    }

    let out = args
        .out
        .or(cfg.site.output)
        .ok_or_else(|| CliError::Validation {
            field: "out".into(),
            reason: "no output file; pass --out or set site.output".into(),
        })?;

    let page = Arc::new(Mutex::new(Page::new(portal_cfg.layout.clone())));
    let portal = Portal::with_shared_target(portal_cfg, Arc::clone(&page))?;
    let writer = spawn_page_writer(page, out.clone(), portal.cancel_token());

    portal.start().await;
    if !global.quiet {
        eprintln!(
            "Watching {} project(s) every {}, writing {} (Ctrl-C to stop)",
            portal.registry().len(),
            humantime::format_duration(portal.config().poll_interval),
            out.display()
        );
    }

    tokio::signal::ctrl_c().await?;
    info!("interrupt received, shutting down");

    portal.shutdown().await;
    let _ = writer.await;
    Ok(())
}

//! Project listing.

use serde::Serialize;
use tabled::Tabled;

use portico_core::Registry;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output::Printer;

#[derive(Debug, Serialize)]
struct ProjectListing {
    id: String,
    name: String,
    status: String,
    path: String,
    endpoint: Option<String>,
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Health Endpoint")]
    endpoint: String,
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (_, portal) = config::load_portal_config(global)?;
    let registry = Registry::new(portal.projects, portal.health_endpoints)?;

    let listings: Vec<ProjectListing> = registry
        .snapshot()
        .iter()
        .map(|p| ProjectListing {
            id: p.id.clone(),
            name: p.name.clone(),
            status: p.status.to_string(),
            path: p.path.clone(),
            endpoint: registry.endpoint(&p.id).map(str::to_owned),
        })
        .collect();

    let printer = Printer::new(global);
    let out = printer.list(
        &listings,
        |p| ProjectRow {
            id: p.id.clone(),
            name: p.name.clone(),
            status: printer.badge(&p.status, p.status == "online"),
            path: p.path.clone(),
            endpoint: p.endpoint.clone().unwrap_or_else(|| "-".into()),
        },
        |p| p.id.clone(),
    );
    printer.emit(&out);
    Ok(())
}

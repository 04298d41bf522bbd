//! Config subcommand handlers.

use portico_core::Registry;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output::Printer;

fn to_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to serialize config: {e}"))
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let printer = Printer::new(global);
    match args.command {
        ConfigCommand::Path => {
            println!("{}", config::resolve_path(global).display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            printer.emit(&printer.document(&cfg, to_toml, to_toml));
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = config::resolve_path(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            config::save_config_to(&Config::sample(), &path)?;
            if !global.quiet {
                eprintln!("Wrote starter config to {}", path.display());
                eprintln!("Edit the [[projects]] entries, then run: portico render");
            }
            Ok(())
        }

        ConfigCommand::Validate => {
            let (_, portal) = config::load_portal_config(global)?;
            let registry = Registry::new(portal.projects, portal.health_endpoints)?;

            let probed = registry
                .snapshot()
                .iter()
                .filter(|p| registry.endpoint(&p.id).is_some())
                .count();
            printer.emit(&format!(
                "Config OK: {} project(s), {probed} with health endpoints",
                registry.len()
            ));
            Ok(())
        }
    }
}

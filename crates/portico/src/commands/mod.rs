//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod check;
pub mod config_cmd;
pub mod projects;
pub mod render;
pub mod watch;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a config-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Render(args) => render::handle(args, global).await,
        Command::Watch(args) => watch::handle(args, global).await,
        Command::Check(args) => check::handle(args, global).await,
        Command::Projects => projects::handle(global),
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "completions are generated before dispatch".into(),
        }),
    }
}

//! Command dispatch: bridges CLI args -> dashboard queries -> output formatting.

pub mod alerts;
pub mod config_cmd;
pub mod export;
pub mod facilities;
pub mod overlays;
pub mod terminal;
pub mod types;
pub mod util;

use hivemap_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command that needs loaded facilities.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Facilities(args) => facilities::handle(dashboard, args, global),
        Command::Export(args) => export::handle(dashboard, args, global).await,
        Command::Alerts => alerts::handle(dashboard, global),
        Command::Overlays(args) => overlays::handle(dashboard, args, global),
        Command::Terminal(args) => terminal::handle(dashboard, &args, global),
        Command::Types | Command::Config(_) | Command::Completions(_) => {
            Err(CliError::Internal {
                message: "command does not operate on loaded facilities".into(),
            })
        }
    }
}

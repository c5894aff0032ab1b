//! Command dispatch: bridges CLI args to the `Console` and output formatting.

pub mod calendar;
pub mod config_cmd;
pub mod customers;
pub mod stats;
pub mod trainings;
pub mod util;

use coachdesk_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to its handler.
pub async fn dispatch(cmd: Command, console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Customers(args) => customers::handle(console, args, global).await,
        Command::Trainings(args) => trainings::handle(console, args, global).await,
        Command::Stats => stats::handle(console, global).await,
        Command::Calendar(args) => calendar::handle(console, args, global).await,
        // Config and Completions are handled before a Console exists
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need a backend".into(),
        )),
    }
}

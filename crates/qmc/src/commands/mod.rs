//! Command dispatch: bridges CLI args -> console operations -> output formatting.

pub mod config_cmd;
pub mod group_provider;
pub mod ha;
pub mod jmx;
pub mod util;

use qmc_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a broker-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Ha(args) => ha::handle(console, args, global).await,
        Command::GroupProvider(args) => group_provider::handle(console, args, global).await,
        Command::Jmx(args) => jmx::handle(console, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

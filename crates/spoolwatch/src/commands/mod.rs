//! Command dispatch: bridges CLI args -> core Poller -> output formatting.

pub mod check;
pub mod config_cmd;
pub mod spools;
pub mod status;
pub mod watch;

use spoolwatch_core::Poller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, poller: &Poller, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Check => check::handle(poller, global).await,
        Command::Status => status::handle(poller, global).await,
        Command::Spools(args) => spools::handle(poller, &args, global).await,
        Command::Watch(args) => watch::handle(poller, &args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

//! Command dispatch: bridges CLI args -> datasource/engine calls -> output.

pub mod apply;
pub mod fetch;
pub mod netconf;
pub mod probe;

use cloudseed_config::Config;
use cloudseed_datasource::DatasourceRegistry;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a datasource-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    registry: &DatasourceRegistry,
    config: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Probe(_) => probe::handle(registry, global).await,
        Command::Fetch(args) => fetch::handle(registry, args, global).await,
        Command::Netconf(args) => netconf::handle(registry, args, global).await,
        Command::Apply(args) => apply::handle(registry, config, args, global).await,
        // Completions is handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}

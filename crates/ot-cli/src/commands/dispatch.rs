use ot_api::OrthancClient;
use ot_config::ToolConfig;
use ot_watch::CancellationToken;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    client: &OrthancClient,
    config: &ToolConfig,
    flags: &GlobalFlags,
    shutdown: &CancellationToken,
) -> anyhow::Result<()> {
    match command {
        Commands::Changes(args) => commands::changes::handle(&args, client, config, shutdown).await,
        Commands::Patients(args) => commands::patients::handle_list(&args, client, shutdown).await,
        Commands::Patient(args) => commands::patients::handle_get(&args, client, flags).await,
    }
}

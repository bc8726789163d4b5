use clap::Parser;
use logvault::cli::{self, Cli, Commands};
use logvault::env;
use logvault::logging;
use logvault::store::{LogStore, SqliteLogStore};
use tracing::error;

#[tokio::main]
async fn main() {
    // Parse CLI commands
    let cli = Cli::parse();

    // Environment commands report on the configuration themselves
    let command = match cli.command {
        Commands::Env { action } => {
            if let Err(e) = cli::run_env_command(action) {
                eprintln!("{}", e);
                std::process::exit(1);
            }
            return;
        }
        command => command,
    };

    // Validate environment and load configuration
    let config = env::get_config();
    logging::init_tracing(&config.log_level);

    let result = match command {
        Commands::Migrate { action } => cli::run_migrate_command(&config, action).await,
        command => match SqliteLogStore::connect(&config).await {
            Ok(store) => {
                let result = cli::run_store_command(&store, command).await;
                store.close().await;
                result
            }
            Err(e) => Err(e.into()),
        },
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

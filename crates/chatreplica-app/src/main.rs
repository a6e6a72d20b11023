use anyhow::Result;
use clap::Parser;

use chatreplica::app::{run_ask_mode, run_repl_mode, run_web_server, setup_from_cli};
use chatreplica::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    // Set up application configuration from CLI
    let app_config = setup_from_cli(&cli)?;

    match cli.command.clone().unwrap_or(Commands::Chat) {
        Commands::Serve {
            bind,
            port,
            messages_file,
        } => run_web_server(app_config, &bind, port, messages_file).await,
        Commands::Ask { message } => run_ask_mode(app_config, message).await,
        Commands::Chat => run_repl_mode(app_config).await,
    }
}

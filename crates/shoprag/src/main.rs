//! OnlineShopRAG command-line entry point.

use clap::Parser;
use shoprag::cli::{
    Cli, Commands, ScenarioCommand, handle_run_command, handle_serve_command,
    handle_validate_command,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { config } => handle_serve_command(config).await,
        Commands::Scenario(ScenarioCommand::Validate { file, strict }) => {
            handle_validate_command(file, strict)
        }
        Commands::Scenario(ScenarioCommand::Run {
            file,
            message,
            config,
        }) => handle_run_command(file, message, config).await,
    }
}

//! Auth Service - HTTP server and maintenance commands.

use clap::Parser;

use auth_service_lib::{
    cli::{Cli, Commands},
    commands,
    config::AuthServiceConfig,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match AuthServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = common::logging::init(&config.logging, cli.verbose) {
        eprintln!("failed to initialize logging: {}", e);
    }
    if config.uses_development_secret() {
        tracing::warn!("JWT_SECRET not set, using the development secret");
    }
    tracing::debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Migrate { action } => commands::migrate::execute(action, config).await,
        Commands::Sweep { action } => commands::sweep::execute(action, config).await,
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

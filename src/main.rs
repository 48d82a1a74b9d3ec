//! SeeSea - shipping intelligence from the terminal
//!
//! Main entry point for the SeeSea client.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use seesea::cli::{Cli, Commands};
use seesea::commands;
use seesea::commands::vessels::VesselArgs;
use seesea::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Execute command
    match cli.command {
        Commands::Chat { message } => {
            tracing::info!("Starting chat");
            commands::chat::run_chat(config, message).await?;
            Ok(())
        }
        Commands::Vessels {
            chokepoint,
            start,
            end,
            json,
        } => {
            tracing::info!("Starting vessel statistics query");
            let args = VesselArgs {
                chokepoint,
                start,
                end,
                json,
            };
            commands::vessels::run_vessels(&config, args).await?;
            Ok(())
        }
        Commands::Chokepoints { json } => {
            commands::chokepoints::list_chokepoints(&config, json)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so streamed answers on stdout stay clean.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "seesea=debug" } else { "seesea=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

//! Command-line interface definition for SeeSea
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the streaming chat, vessel statistics and the
//! chokepoint catalog.

use clap::{Parser, Subcommand};

/// SeeSea - shipping intelligence from the terminal
///
/// Ask the SeeSea assistant questions over a streaming connection and
/// query daily vessel traffic through maritime chokepoints.
#[derive(Parser, Debug, Clone)]
#[command(name = "seesea")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the chat API base URL
    #[arg(long)]
    pub chat_url: Option<String>,

    /// Override the vessel statistics API base URL
    #[arg(long)]
    pub vessel_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for SeeSea
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Chat with the SeeSea assistant
    Chat {
        /// Ask a single question and exit instead of starting a session
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show vessel traffic statistics for a chokepoint
    Vessels {
        /// Chokepoint identifier (see `seesea chokepoints`)
        #[arg(short, long)]
        chokepoint: Option<String>,

        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Last day of the range (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the known chokepoints
    Chokepoints {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            chat_url: None,
            vessel_url: None,
            command: Commands::Chokepoints { json: false },
        }
    }
}

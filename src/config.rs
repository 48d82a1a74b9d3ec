//! Configuration management for SeeSea
//!
//! This module handles loading configuration from a YAML file, environment
//! variables, and CLI overrides. Missing values fall back to localhost
//! defaults; nothing here fails at startup because a backend is absent.

use crate::error::{Result, SeeseaError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for SeeSea
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API endpoints
    #[serde(default)]
    pub api: ApiConfig,
    /// Map provider settings
    #[serde(default)]
    pub map: MapConfig,
    /// Chat session settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the conversational AI service
    #[serde(default = "default_chat_url")]
    pub chat_url: String,

    /// Base URL of the vessel statistics service
    #[serde(default = "default_vessel_url")]
    pub vessel_url: String,

    /// TCP connect timeout for both services (seconds)
    ///
    /// Only connection establishment is bounded; a stalled chat stream is
    /// never cut off by the client.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

fn default_chat_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_vessel_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            chat_url: default_chat_url(),
            vessel_url: default_vessel_url(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

/// Map provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Access token for the map tile provider
    #[serde(default)]
    pub access_token: String,

    /// Chokepoint focused when no explicit one is requested
    #[serde(default = "default_chokepoint")]
    pub default_chokepoint: String,
}

fn default_chokepoint() -> String {
    "suez-canal".to_string()
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            default_chokepoint: default_chokepoint(),
        }
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Prefix for generated stream session identifiers
    #[serde(default = "default_session_prefix")]
    pub session_prefix: String,

    /// Greeting shown as the first AI message of an interactive session
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

fn default_session_prefix() -> String {
    "user-session-".to_string()
}

fn default_greeting() -> String {
    "Welcome to SeeSea! I'm your shipping intelligence assistant.\n\n\
     You can ask me things like:\n\
     • \"How is traffic through the Suez Canal lately?\"\n\
     • \"Why is this route so busy?\"\n\
     • \"Analyse the trend over the last month\""
        .to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            session_prefix: default_session_prefix(),
            greeting: default_greeting(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SeeseaError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| SeeseaError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(url) = std::env::var("SEESEA_CHAT_API_URL") {
            self.api.chat_url = url;
        }

        if let Ok(url) = std::env::var("SEESEA_VESSEL_API_URL") {
            self.api.vessel_url = url;
        }

        if let Ok(token) = std::env::var("SEESEA_MAPBOX_TOKEN") {
            self.map.access_token = token;
        }

        if let Ok(timeout) = std::env::var("SEESEA_CONNECT_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(value) => self.api.connect_timeout_seconds = value,
                Err(_) => tracing::warn!(
                    "Ignoring invalid SEESEA_CONNECT_TIMEOUT_SECONDS value: {}",
                    timeout
                ),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(url) = &cli.chat_url {
            self.api.chat_url = url.clone();
        }

        if let Some(url) = &cli.vessel_url {
            self.api.vessel_url = url.clone();
        }
    }
}

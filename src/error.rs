//! Error types for SeeSea
//!
//! This module defines the error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for SeeSea operations
///
/// Chat stream failures never reach the caller as errors: they are folded
/// into a notice on the AI placeholder message. These variants cover the
/// remaining surfaces (configuration, vessel statistics, CLI input).
#[derive(Error, Debug)]
pub enum SeeseaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chat backend transport errors (connect failure, non-OK status)
    #[error("Chat transport error: {0}")]
    ChatTransport(String),

    /// Vessel statistics API errors
    #[error("Vessel API error: {0}")]
    VesselApi(String),

    /// Start date is after end date, or a date failed to parse
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// Chokepoint identifier not present in the catalog
    #[error("Unknown chokepoint: {0}")]
    UnknownChokepoint(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for SeeSea operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

//! Error types for rusty_signal_sim
//!
//! The engine operations themselves never fail toward their caller; these
//! errors only surface from strict parsing, configuration and exports.

use thiserror::Error;

/// Main error type for rusty_signal_sim
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result type alias for rusty_signal_sim operations
pub type Result<T> = std::result::Result<T, SimError>;

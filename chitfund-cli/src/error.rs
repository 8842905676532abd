//! Structured error types for the chit fund CLI
//!
//! Engine failures arrive as [`FundError`] and are wrapped unchanged so the
//! shell can tell completion conditions apart from ordinary rejections.

use lib_chitfund::FundError;
use thiserror::Error;

/// CLI error types with context
#[derive(Error, Debug)]
pub enum CliError {
    // Fund operations
    #[error(transparent)]
    Fund(#[from] FundError),

    #[error("No funds found in {0}")]
    NoFunds(String),

    // User input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Input closed")]
    InputClosed,

    // Configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to load config from {path}: {reason}")]
    ConfigLoadFailed { path: String, reason: String },

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    // Path operations
    #[error("Path error: {0}")]
    PathError(String),

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    // I/O operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // Serialization
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CliError {
    /// The fund reached its completed phase; the shell should offer the completion menu
    pub fn is_fund_completion(&self) -> bool {
        matches!(self, CliError::Fund(e) if e.is_completion())
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

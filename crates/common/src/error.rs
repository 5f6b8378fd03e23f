//! Error types for the Saucedemo suite

use thiserror::Error;

/// Result type alias using the common Error
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration and data loading errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid URL in {var}: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    #[error("Failed to load environment file {path}: {reason}")]
    EnvFile { path: String, reason: String },

    #[error("Invalid test data: {0}")]
    InvalidTestData(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Unknown sort order: {0}")]
    UnknownSortOrder(String),
}

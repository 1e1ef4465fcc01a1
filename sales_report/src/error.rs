//! Error types for the sales_report crate

use sales_pipeline::SalesError;
use std::path::PathBuf;
use thiserror::Error;
use zip::result::ZipError;

/// Custom error types for the sales_report crate
#[derive(Debug, Error)]
pub enum ReportError {
    /// Explicitly requested config file does not exist
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// Config values that parse but cannot be used
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Rendering a view into an artifact failed
    #[error("Sink error: {0}")]
    Sink(String),

    /// Bundling artifacts into an archive failed
    #[error("Export error: {0}")]
    Export(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from writing CSV artifacts
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from writing JSON artifacts
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from parsing the config file
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Error from loading or computing views
    #[error(transparent)]
    Pipeline(#[from] SalesError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ReportError>;

impl From<ZipError> for ReportError {
    fn from(err: ZipError) -> Self {
        ReportError::Export(err.to_string())
    }
}

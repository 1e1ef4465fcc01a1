//! Error types for the sales_pipeline crate

use polars::prelude::PolarsError;
use sales_math::MathError;
use thiserror::Error;

/// Custom error types for the sales_pipeline crate
#[derive(Debug, Error)]
pub enum SalesError {
    /// Malformed or missing source columns/values at load time
    #[error("Load error: {0}")]
    Load(String),

    /// A view needs more rows or points than the current filter leaves
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Model fitting failed for reasons other than data volume
    #[error("Forecast error: {0}")]
    Forecast(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    Polars(String),

    /// Error from reading an Excel workbook
    #[error("Excel error: {0}")]
    Excel(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, SalesError>;

impl From<PolarsError> for SalesError {
    fn from(err: PolarsError) -> Self {
        SalesError::Polars(err.to_string())
    }
}

impl From<calamine::Error> for SalesError {
    fn from(err: calamine::Error) -> Self {
        SalesError::Excel(err.to_string())
    }
}

impl From<MathError> for SalesError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(msg) => SalesError::InsufficientData(msg),
            MathError::InvalidInput(msg) => SalesError::InvalidParameter(msg),
            MathError::CalculationError(msg) => SalesError::Forecast(msg),
        }
    }
}

impl SalesError {
    /// Whether the error only reflects a filter that leaves too little data
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, SalesError::InsufficientData(_))
    }
}

//! # Sales Math
//!
//! Numeric building blocks used by the sales pipeline.
//! This crate provides the streaming and batch calculations behind the
//! derived views: trailing rolling means, Holt's double exponential
//! smoothing, Pearson correlation and distribution summaries.

use thiserror::Error;

pub mod correlation;
pub mod distribution;
pub mod forecasting;
pub mod moving_averages;

/// Errors that can occur in sales math calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for sales math operations
pub type Result<T> = std::result::Result<T, MathError>;

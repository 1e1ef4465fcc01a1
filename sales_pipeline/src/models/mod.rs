//! Forecasting models for monthly sales series

use crate::error::{Result, SalesError};
use std::fmt::Debug;

/// Forecast result containing predicted values
#[derive(Debug, Clone)]
pub struct ForecastResult {
    /// Forecasted values
    values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(SalesError::InvalidParameter(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SalesError::Forecast(
                "Model produced a non-finite value".to_string(),
            ));
        }

        Ok(Self { values, horizons })
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    /// Calculate mean squared error between forecast and actual values
    pub fn mean_squared_error(&self, actual: &[f64]) -> Result<f64> {
        self.check_len(actual)?;
        let sum: f64 = self
            .values
            .iter()
            .zip(actual.iter())
            .map(|(f, a)| (f - a).powi(2))
            .sum();

        Ok(sum / self.values.len() as f64)
    }

    fn check_len(&self, actual: &[f64]) -> Result<()> {
        if self.values.len() != actual.len() || actual.is_empty() {
            return Err(SalesError::InvalidParameter(format!(
                "Forecast length ({}) doesn't match actual length ({})",
                self.values.len(),
                actual.len()
            )));
        }
        Ok(())
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizons: usize) -> Result<ForecastResult>;

    /// One-step-ahead predictions over the training series
    fn predict(&self) -> Result<ForecastResult>;

    /// Name of the model, including fitted parameters
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a series of observations
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on an ordered series
    fn train(&self, series: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod holt;

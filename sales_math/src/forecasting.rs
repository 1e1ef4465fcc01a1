//! Exponential smoothing for trend forecasting
//!
//! Contains Holt's double exponential smoothing (additive trend, no
//! seasonality), both as a streaming state and as a batch fit that reports
//! the one-step-ahead squared error used for parameter selection.

use crate::{MathError, Result};

/// Double Exponential Smoothing (Holt's Method) implementation
#[derive(Debug, Clone)]
pub struct DoubleExponentialSmoothing {
    alpha: f64,
    beta: f64,
    level: Option<f64>,
    trend: Option<f64>,
}

/// Result of fitting a [`DoubleExponentialSmoothing`] to a whole series
#[derive(Debug, Clone)]
pub struct HoltFit {
    /// Smoothing state after the last observation
    pub model: DoubleExponentialSmoothing,
    /// Sum of squared one-step-ahead errors
    pub sse: f64,
    /// One-step-ahead predictions, aligned with the observations
    pub fitted: Vec<f64>,
}

impl DoubleExponentialSmoothing {
    /// Create a new Double Exponential Smoothing with the specified parameters
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(MathError::InvalidInput(
                "Alpha must be between 0 and 1 (exclusive)".to_string(),
            ));
        }
        if !(beta > 0.0 && beta < 1.0) {
            return Err(MathError::InvalidInput(
                "Beta must be between 0 and 1 (exclusive)".to_string(),
            ));
        }

        Ok(Self {
            alpha,
            beta,
            level: None,
            trend: None,
        })
    }

    /// Seed the level and trend explicitly
    pub fn initialize(&mut self, level: f64, trend: f64) {
        self.level = Some(level);
        self.trend = Some(trend);
    }

    /// Update the smoothing state with a new observation
    pub fn update(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Observation {} is not finite",
                value
            )));
        }

        match (self.level, self.trend) {
            (None, None) => {
                self.level = Some(value);
                self.trend = Some(0.0);
            }
            (Some(prev_level), Some(prev_trend)) => {
                let new_level = self.alpha * value + (1.0 - self.alpha) * (prev_level + prev_trend);
                let new_trend =
                    self.beta * (new_level - prev_level) + (1.0 - self.beta) * prev_trend;

                self.level = Some(new_level);
                self.trend = Some(new_trend);
            }
            _ => {
                return Err(MathError::CalculationError(
                    "Inconsistent state: level and trend should both be Some or None".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Fit the smoothing recursion over a whole series.
    ///
    /// The level starts at the first observation and the trend at the
    /// difference between the first two.
    pub fn fit(alpha: f64, beta: f64, series: &[f64]) -> Result<HoltFit> {
        if series.len() < 2 {
            return Err(MathError::InsufficientData(format!(
                "Holt smoothing needs at least 2 observations, got {}",
                series.len()
            )));
        }
        if let Some(bad) = series.iter().find(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(format!(
                "Series contains a non-finite value: {}",
                bad
            )));
        }

        let mut model = Self::new(alpha, beta)?;
        model.initialize(series[0], series[1] - series[0]);

        let mut fitted = Vec::with_capacity(series.len());
        fitted.push(series[0]);
        let mut sse = 0.0;

        for &value in &series[1..] {
            let prediction = model.forecast(1)?;
            let error = value - prediction;
            sse += error * error;
            fitted.push(prediction);
            model.update(value)?;
        }

        if !sse.is_finite() {
            return Err(MathError::CalculationError(
                "Squared error overflowed while fitting".to_string(),
            ));
        }

        Ok(HoltFit { model, sse, fitted })
    }

    /// Get the current smoothed level
    pub fn value(&self) -> Result<f64> {
        match self.level {
            Some(level) => Ok(level),
            None => Err(MathError::InsufficientData(
                "No data available for double exponential smoothing".to_string(),
            )),
        }
    }

    /// Get the current trend estimate
    pub fn trend(&self) -> Result<f64> {
        match self.trend {
            Some(trend) => Ok(trend),
            None => Err(MathError::InsufficientData(
                "No data available for double exponential smoothing".to_string(),
            )),
        }
    }

    /// Forecast h steps ahead
    pub fn forecast(&self, h: usize) -> Result<f64> {
        match (self.level, self.trend) {
            (Some(level), Some(trend)) => Ok(level + (h as f64) * trend),
            _ => Err(MathError::InsufficientData(
                "Not enough data to make a forecast".to_string(),
            )),
        }
    }

    /// Get the alpha (level) parameter
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Get the beta (trend) parameter
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Reset the smoothing state, clearing level and trend
    pub fn reset(&mut self) {
        self.level = None;
        self.trend = None;
    }
}

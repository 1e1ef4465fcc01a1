//! Trailing moving averages
//!
//! The rolling mean here behaves like a `min_periods = 1` window: until the
//! window is full, the average is taken over every value seen so far.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Trailing rolling mean over at most `period` values
#[derive(Debug, Clone)]
pub struct RollingMean {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl RollingMean {
    /// Create a new rolling mean with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Push a new value and return the mean of the current window
    pub fn update(&mut self, value: f64) -> f64 {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }

        self.sum / self.values.len() as f64
    }

    /// Get the mean of the current window
    pub fn value(&self) -> Result<f64> {
        if self.values.is_empty() {
            return Err(MathError::InsufficientData(
                "No values in rolling window".to_string(),
            ));
        }

        Ok(self.sum / self.values.len() as f64)
    }

    /// Number of values currently inside the window
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value has been pushed yet
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reset the rolling mean, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}

/// Trailing rolling mean of a whole series.
///
/// Position `i` holds the mean of the `min(period, i + 1)` most recent values.
pub fn trailing_mean(values: &[f64], period: usize) -> Result<Vec<f64>> {
    let mut rolling = RollingMean::new(period)?;
    Ok(values.iter().map(|&v| rolling.update(v)).collect())
}

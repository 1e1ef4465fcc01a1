//! Holt's linear (additive trend, no seasonality) exponential smoothing

use crate::error::{Result, SalesError};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use sales_math::forecasting::{DoubleExponentialSmoothing, HoltFit};
use sales_math::MathError;

/// Coarse search grid step for the smoothing parameters
const COARSE_STEP: f64 = 0.05;
/// Refinement step around the best coarse candidate
const FINE_STEP: f64 = 0.005;
const MIN_PARAM: f64 = 0.001;
const MAX_PARAM: f64 = 0.999;

/// Holt's linear trend model
#[derive(Debug, Clone)]
pub struct HoltLinear {
    /// Name of the model
    name: String,
    /// Fixed (alpha, beta); `None` selects them by minimizing SSE
    params: Option<(f64, f64)>,
}

/// Trained Holt's linear trend model
#[derive(Debug, Clone)]
pub struct TrainedHoltLinear {
    /// Name of the model
    name: String,
    /// Smoothing state after the last observation
    state: DoubleExponentialSmoothing,
    /// One-step-ahead predictions over the training series
    fitted: Vec<f64>,
    /// Sum of squared one-step-ahead errors
    sse: f64,
}

impl HoltLinear {
    /// Model whose smoothing parameters are fitted to the data
    pub fn optimized() -> Self {
        Self {
            name: "Holt linear trend (optimized)".to_string(),
            params: None,
        }
    }

    /// Model with fixed smoothing parameters, both in (0, 1)
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        DoubleExponentialSmoothing::new(alpha, beta)?;

        Ok(Self {
            name: format!("Holt linear trend (alpha={}, beta={})", alpha, beta),
            params: Some((alpha, beta)),
        })
    }
}

impl Default for HoltLinear {
    fn default() -> Self {
        Self::optimized()
    }
}

fn fit(alpha: f64, beta: f64, series: &[f64]) -> Result<HoltFit> {
    DoubleExponentialSmoothing::fit(alpha, beta, series).map_err(|err| match err {
        MathError::InsufficientData(msg) => SalesError::InsufficientData(msg),
        other => SalesError::Forecast(other.to_string()),
    })
}

fn grid(center: Option<f64>) -> Vec<f64> {
    match center {
        None => (1..20).map(|i| i as f64 * COARSE_STEP).collect(),
        Some(c) => (-10..=10)
            .map(|i| c + i as f64 * FINE_STEP)
            .filter(|p| (MIN_PARAM..=MAX_PARAM).contains(p))
            .collect(),
    }
}

/// Grid search over (alpha, beta) keeping the first minimum of the SSE
fn search(series: &[f64], alphas: &[f64], betas: &[f64]) -> Result<HoltFit> {
    let mut best: Option<HoltFit> = None;
    for &alpha in alphas {
        for &beta in betas {
            let candidate = fit(alpha, beta, series)?;
            if best.as_ref().map_or(true, |b| candidate.sse < b.sse) {
                best = Some(candidate);
            }
        }
    }

    best.ok_or_else(|| SalesError::Forecast("No smoothing parameters to evaluate".to_string()))
}

impl ForecastModel for HoltLinear {
    type Trained = TrainedHoltLinear;

    fn train(&self, series: &[f64]) -> Result<Self::Trained> {
        if series.len() < 2 {
            return Err(SalesError::InsufficientData(format!(
                "Trend smoothing needs at least 2 points, got {}",
                series.len()
            )));
        }
        if series.iter().any(|v| !v.is_finite()) {
            return Err(SalesError::Forecast(
                "Series contains non-finite values".to_string(),
            ));
        }

        let best = match self.params {
            Some((alpha, beta)) => fit(alpha, beta, series)?,
            None => {
                let coarse = search(series, &grid(None), &grid(None))?;
                search(
                    series,
                    &grid(Some(coarse.model.alpha())),
                    &grid(Some(coarse.model.beta())),
                )?
            }
        };

        let alpha = best.model.alpha();
        let beta = best.model.beta();
        log::debug!(
            "Holt fit on {} points: alpha={:.3} beta={:.3} sse={:.3}",
            series.len(),
            alpha,
            beta,
            best.sse
        );

        Ok(TrainedHoltLinear {
            name: format!("Holt linear trend (alpha={:.3}, beta={:.3})", alpha, beta),
            state: best.model,
            fitted: best.fitted,
            sse: best.sse,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedHoltLinear {
    /// Fitted level smoothing parameter
    pub fn alpha(&self) -> f64 {
        self.state.alpha()
    }

    /// Fitted trend smoothing parameter
    pub fn beta(&self) -> f64 {
        self.state.beta()
    }

    /// Sum of squared one-step-ahead errors over the training series
    pub fn sse(&self) -> f64 {
        self.sse
    }
}

impl TrainedForecastModel for TrainedHoltLinear {
    fn forecast(&self, horizons: usize) -> Result<ForecastResult> {
        let values = (1..=horizons)
            .map(|h| self.state.forecast(h))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        ForecastResult::new(values, horizons)
    }

    fn predict(&self) -> Result<ForecastResult> {
        ForecastResult::new(self.fitted.clone(), self.fitted.len())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_increasing_series_keeps_rising() {
        let trained = HoltLinear::optimized()
            .train(&[100.0, 200.0, 300.0])
            .unwrap();
        let forecast = trained.forecast(6).unwrap();

        assert_eq!(forecast.horizons(), 6);
        assert!(forecast.values()[0] > 300.0);
        assert!(forecast.values().windows(2).all(|w| w[1] > w[0]));
        assert_relative_eq!(forecast.values()[0], 400.0, epsilon = 1e-9);
    }

    #[test]
    fn test_optimizer_beats_fixed_parameters() {
        let series = [120.0, 135.0, 128.0, 150.0, 161.0, 158.0, 175.0, 190.0];
        let optimized = HoltLinear::optimized().train(&series).unwrap();
        let fixed = HoltLinear::new(0.5, 0.5).unwrap().train(&series).unwrap();
        assert!(optimized.sse() <= fixed.sse() + 1e-6);
        assert!(optimized.alpha() > 0.0 && optimized.alpha() < 1.0);
    }

    #[test]
    fn test_constant_series_forecasts_flat() {
        let trained = HoltLinear::optimized().train(&[50.0, 50.0, 50.0]).unwrap();
        for value in trained.forecast(3).unwrap().values() {
            assert_relative_eq!(*value, 50.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_in_sample_predictions() {
        let trained = HoltLinear::new(0.4, 0.2).unwrap().train(&[1.0, 2.0, 4.0]).unwrap();
        let predicted = trained.predict().unwrap();
        assert_eq!(predicted.horizons(), 3);
        assert!(predicted.mean_squared_error(&[1.0, 2.0, 4.0]).unwrap() >= 0.0);
    }

    #[test]
    fn test_single_point_is_insufficient() {
        let err = HoltLinear::optimized().train(&[10.0]).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_non_finite_series_is_forecast_error() {
        let err = HoltLinear::optimized().train(&[10.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, SalesError::Forecast(_)));
    }

    #[test]
    fn test_invalid_fixed_parameters() {
        assert!(HoltLinear::new(1.5, 0.1).is_err());
    }
}

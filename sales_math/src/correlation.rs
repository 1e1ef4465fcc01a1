//! Pearson correlation

use crate::{MathError, Result};
use statrs::statistics::Statistics;

/// Pearson correlation coefficient between two equally long samples.
///
/// Returns `Ok(None)` when either sample has zero variance, since the
/// coefficient is undefined there.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<Option<f64>> {
    if x.len() != y.len() {
        return Err(MathError::InvalidInput(format!(
            "Samples have different lengths ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Correlation needs at least 2 observations, got {}",
            x.len()
        )));
    }

    let sd_x = x.iter().std_dev();
    let sd_y = y.iter().std_dev();
    if !(sd_x > 0.0) || !(sd_y > 0.0) {
        return Ok(None);
    }

    let covariance = x.iter().covariance(y.iter());
    let r = covariance / (sd_x * sd_y);
    if !r.is_finite() {
        return Err(MathError::CalculationError(
            "Correlation coefficient is not finite".to_string(),
        ));
    }

    Ok(Some(r.clamp(-1.0, 1.0)))
}

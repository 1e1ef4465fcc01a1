//! Distribution summaries: five-number summaries and equal-width histograms

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution, Max, Median, Min, OrderStatistics};

/// Location and spread of a sample, as drawn by a box plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub lower_quartile: f64,
    pub upper_quartile: f64,
}

impl Summary {
    /// Summarize a non-empty sample
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot summarize an empty sample".to_string(),
            ));
        }

        let mut data = Data::new(values.to_vec());
        let mean = data.mean().ok_or_else(|| {
            MathError::CalculationError("Mean is undefined for this sample".to_string())
        })?;

        Ok(Self {
            count: values.len(),
            mean,
            median: data.median(),
            min: data.min(),
            max: data.max(),
            lower_quartile: data.lower_quartile(),
            upper_quartile: data.upper_quartile(),
        })
    }

    /// Distance between the upper and lower quartile
    pub fn interquartile_range(&self) -> f64 {
        self.upper_quartile - self.lower_quartile
    }
}

/// Equal-width histogram; `edges` has one more entry than `counts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin a non-empty sample into `bins` equal-width buckets.
    ///
    /// The last bucket is closed on the right. A sample whose values are all
    /// equal is binned over `[value - 0.5, value + 0.5]`.
    pub fn from_values(values: &[f64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(MathError::InvalidInput(
                "Histogram needs at least one bin".to_string(),
            ));
        }
        if values.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot build a histogram from an empty sample".to_string(),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Histogram input contains a non-finite value".to_string(),
            ));
        }

        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0; bins];
        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Self { edges, counts })
    }

    /// Total number of binned values
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_summary_of_odd_sample() {
        let summary = Summary::from_values(&[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_eq!(summary.count, 5);
        assert_relative_eq!(summary.mean, 3.0);
        assert_relative_eq!(summary.median, 3.0);
        assert_relative_eq!(summary.min, 1.0);
        assert_relative_eq!(summary.max, 5.0);
        assert!(summary.lower_quartile <= summary.median);
        assert!(summary.upper_quartile >= summary.median);
        assert!(summary.interquartile_range() >= 0.0);
    }

    #[test]
    fn test_summary_of_even_sample() {
        let summary = Summary::from_values(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert_relative_eq!(summary.median, 25.0);
    }

    #[test]
    fn test_summary_empty() {
        assert!(Summary::from_values(&[]).is_err());
    }

    #[test]
    fn test_histogram_counts() {
        let hist = Histogram::from_values(&[0.0, 1.0, 2.0, 3.0, 4.0], 2).unwrap();
        assert_eq!(hist.edges, vec![0.0, 2.0, 4.0]);
        assert_eq!(hist.counts, vec![2, 3]);
        assert_eq!(hist.total(), 5);
    }

    #[test]
    fn test_histogram_constant_sample() {
        let hist = Histogram::from_values(&[7.0, 7.0, 7.0], 4).unwrap();
        assert_relative_eq!(hist.edges[0], 6.5);
        assert_relative_eq!(hist.edges[4], 7.5);
        assert_eq!(hist.total(), 3);
    }

    #[test]
    fn test_histogram_rejects_zero_bins() {
        assert!(Histogram::from_values(&[1.0], 0).is_err());
    }
}

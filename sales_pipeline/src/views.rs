//! Derived views computed from a filtered sales table
//!
//! Every view is a plain serializable value computed independently from the
//! same filtered table; a failure in one never affects another.

use crate::data::SalesTable;
use crate::error::{Result, SalesError};
use crate::fields::{KeyField, NumericField};
use crate::forecast::Forecast;
use chrono::NaiveDate;
use sales_math::correlation::pearson;
use sales_math::distribution::{Histogram, Summary};
use sales_math::moving_averages::trailing_mean;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default trailing window of the trend's rolling average
pub const ROLLING_WINDOW: usize = 7;

/// Default bin count of the value histogram
pub const HISTOGRAM_BINS: usize = 30;

/// One day of the sales trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub total_price: f64,
    pub rolling_avg: f64,
}

/// Daily total sales with a trailing rolling average, ascending by date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub window: usize,
    pub points: Vec<TrendPoint>,
}

/// Sum of a numeric field per categorical key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAggregate {
    pub key: KeyField,
    pub value: NumericField,
    pub totals: BTreeMap<String, f64>,
}

impl GroupAggregate {
    /// Sum across every group
    pub fn grand_total(&self) -> f64 {
        self.totals.values().sum()
    }
}

/// Distribution of a numeric field per categorical key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub key: KeyField,
    pub value: NumericField,
    pub groups: BTreeMap<String, Summary>,
}

/// Equal-width histogram of a numeric field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueHistogram {
    pub value: NumericField,
    pub histogram: Histogram,
}

/// Pearson correlation between every pair of numeric fields.
///
/// Undefined cells (a field with zero variance) are stored as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub fields: Vec<NumericField>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Coefficient between two fields, `None` if undefined
    pub fn get(&self, a: NumericField, b: NumericField) -> Option<f64> {
        let i = self.fields.iter().position(|f| *f == a)?;
        let j = self.fields.iter().position(|f| *f == b)?;
        self.values.get(i)?.get(j).copied().flatten()
    }
}

/// Any computed result built from a filtered table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivedView {
    Trend(Trend),
    GroupAggregate(GroupAggregate),
    GroupSummary(GroupSummary),
    Histogram(ValueHistogram),
    Correlation(CorrelationMatrix),
    Forecast(Forecast),
}

impl DerivedView {
    /// Short name of the view kind
    pub fn kind(&self) -> &'static str {
        match self {
            DerivedView::Trend(_) => "trend",
            DerivedView::GroupAggregate(_) => "group_aggregate",
            DerivedView::GroupSummary(_) => "group_summary",
            DerivedView::Histogram(_) => "histogram",
            DerivedView::Correlation(_) => "correlation",
            DerivedView::Forecast(_) => "forecast",
        }
    }
}

/// Daily sales trend with the default 7-point rolling average
pub fn trend(filtered: &SalesTable) -> Result<Trend> {
    trend_with_window(filtered, ROLLING_WINDOW)
}

/// Daily sales trend with a rolling average over at most `window` points
pub fn trend_with_window(filtered: &SalesTable, window: usize) -> Result<Trend> {
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in filtered {
        *daily.entry(record.date).or_insert(0.0) += record.total_price;
    }

    let totals: Vec<f64> = daily.values().copied().collect();
    let rolling = trailing_mean(&totals, window)?;

    let points = daily
        .into_iter()
        .zip(rolling)
        .map(|((date, total_price), rolling_avg)| TrendPoint {
            date,
            total_price,
            rolling_avg,
        })
        .collect::<Vec<_>>();

    log::debug!("Trend over {} dates (window {})", points.len(), window);
    Ok(Trend { window, points })
}

/// Sum `value` per distinct `key`
pub fn group_aggregate(
    filtered: &SalesTable,
    key: KeyField,
    value: NumericField,
) -> GroupAggregate {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for record in filtered {
        *totals.entry(record.key(key).to_string()).or_insert(0.0) += record.value(value);
    }

    log::debug!("{} by {}: {} groups", value, key, totals.len());
    GroupAggregate { key, value, totals }
}

/// Count, mean, median, extremes and quartiles of `value` per distinct `key`
pub fn group_summary(
    filtered: &SalesTable,
    key: KeyField,
    value: NumericField,
) -> Result<GroupSummary> {
    let mut samples: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in filtered {
        samples
            .entry(record.key(key).to_string())
            .or_default()
            .push(record.value(value));
    }

    let groups = samples
        .into_iter()
        .map(|(group, values)| Ok((group, Summary::from_values(&values)?)))
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(GroupSummary { key, value, groups })
}

/// Equal-width histogram of `value` over the filtered rows
pub fn histogram(
    filtered: &SalesTable,
    value: NumericField,
    bins: usize,
) -> Result<ValueHistogram> {
    if bins == 0 {
        return Err(SalesError::InvalidParameter(
            "Histogram needs at least one bin".to_string(),
        ));
    }
    if filtered.is_empty() {
        return Err(SalesError::InsufficientData(
            "Histogram needs at least one row".to_string(),
        ));
    }

    let histogram = Histogram::from_values(&filtered.column(value), bins)?;
    Ok(ValueHistogram { value, histogram })
}

/// Pearson correlation matrix over Quantity, UnitPrice, Discount, TotalPrice
pub fn correlation(filtered: &SalesTable) -> Result<CorrelationMatrix> {
    if filtered.len() < 2 {
        return Err(SalesError::InsufficientData(format!(
            "Correlation needs at least 2 rows, the filter leaves {}",
            filtered.len()
        )));
    }

    let fields = NumericField::ALL.to_vec();
    let columns: Vec<Vec<f64>> = fields.iter().map(|f| filtered.column(*f)).collect();

    let mut values = vec![vec![None; fields.len()]; fields.len()];
    for i in 0..fields.len() {
        for j in i..fields.len() {
            let r = if i == j {
                pearson(&columns[i], &columns[j])?.map(|_| 1.0)
            } else {
                pearson(&columns[i], &columns[j])?
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    log::debug!("Correlation over {} rows", filtered.len());
    Ok(CorrelationMatrix { fields, values })
}

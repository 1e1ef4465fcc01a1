//! Monthly resampling and sales forecasting

use crate::data::SalesTable;
use crate::error::{Result, SalesError};
use crate::models::holt::HoltLinear;
use crate::models::{ForecastModel, TrainedForecastModel};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default number of months forecast
pub const FORECAST_PERIODS: usize = 6;

/// Options controlling the monthly forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastOptions {
    /// Number of future months to forecast
    pub periods: usize,
    /// Zero-fill months without transactions between the first and last
    /// observed month instead of skipping them
    pub fill_missing_months: bool,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            periods: FORECAST_PERIODS,
            fill_missing_months: false,
        }
    }
}

/// Total sales of one calendar month, keyed by the month's first day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month: NaiveDate,
    pub total_price: f64,
}

/// Observed monthly history and the months forecast after it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Model name with its fitted parameters
    pub model: String,
    pub history: Vec<MonthlyPoint>,
    pub points: Vec<MonthlyPoint>,
    /// Root mean squared one-step-ahead error over the history
    pub fit_rmse: f64,
}

fn next_month(month: NaiveDate) -> Result<NaiveDate> {
    month
        .checked_add_months(Months::new(1))
        .ok_or_else(|| SalesError::Forecast(format!("No calendar month after {}", month)))
}

/// Sum total_price per calendar month, ascending.
///
/// Months without rows are skipped unless `fill_missing_months` is set, in
/// which case they appear with a zero total.
pub fn monthly_totals(
    filtered: &SalesTable,
    fill_missing_months: bool,
) -> Result<Vec<MonthlyPoint>> {
    let mut months: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in filtered {
        *months.entry(record.month()).or_insert(0.0) += record.total_price;
    }

    if fill_missing_months {
        if let (Some(&first), Some(&last)) = (months.keys().next(), months.keys().next_back()) {
            let mut month = first;
            while month < last {
                month = next_month(month)?;
                months.entry(month).or_insert(0.0);
            }
        }
    }

    Ok(months
        .into_iter()
        .map(|(month, total_price)| MonthlyPoint { month, total_price })
        .collect())
}

/// Forecast monthly sales with Holt's linear trend model
pub fn forecast(filtered: &SalesTable, options: &ForecastOptions) -> Result<Forecast> {
    forecast_with(filtered, options, &HoltLinear::optimized())
}

/// Forecast monthly sales with any forecasting model
pub fn forecast_with<M: ForecastModel>(
    filtered: &SalesTable,
    options: &ForecastOptions,
    model: &M,
) -> Result<Forecast> {
    if options.periods == 0 {
        return Err(SalesError::InvalidParameter(
            "Forecast needs at least one period".to_string(),
        ));
    }

    let history = monthly_totals(filtered, options.fill_missing_months)?;
    if history.len() < 2 {
        return Err(SalesError::InsufficientData(format!(
            "Forecast needs at least 2 monthly points, the filter leaves {}",
            history.len()
        )));
    }

    let series: Vec<f64> = history.iter().map(|p| p.total_price).collect();
    let trained = model.train(&series)?;
    let predicted = trained.forecast(options.periods)?;
    let fit_rmse = trained.predict()?.mean_squared_error(&series)?.sqrt();

    let mut month = history[history.len() - 1].month;
    let mut points = Vec::with_capacity(options.periods);
    for &total_price in predicted.values() {
        month = next_month(month)?;
        points.push(MonthlyPoint { month, total_price });
    }

    log::debug!(
        "{}: {} observed months, {} forecast",
        trained.name(),
        history.len(),
        points.len()
    );

    Ok(Forecast {
        model: trained.name().to_string(),
        history,
        points,
        fit_rmse,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SalesRecord;
    use pretty_assertions::assert_eq;

    fn sale(y: i32, m: u32, d: u32, total_price: f64) -> SalesRecord {
        SalesRecord {
            order_id: format!("{}{}{}", y, m, d),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            region: "North".to_string(),
            product: "Pen".to_string(),
            quantity: 1,
            unit_price: total_price,
            discount: 0.0,
            total_price,
        }
    }

    fn first_of(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_monthly_totals_skip_gaps_by_default() {
        let table = SalesTable::new(vec![
            sale(2024, 1, 3, 10.0),
            sale(2024, 1, 20, 5.0),
            sale(2024, 3, 2, 7.0),
        ]);

        let months = monthly_totals(&table, false).unwrap();
        assert_eq!(
            months,
            vec![
                MonthlyPoint {
                    month: first_of(2024, 1),
                    total_price: 15.0,
                },
                MonthlyPoint {
                    month: first_of(2024, 3),
                    total_price: 7.0,
                },
            ]
        );

        let filled = monthly_totals(&table, true).unwrap();
        assert_eq!(filled.len(), 3);
        assert_eq!(
            filled[1],
            MonthlyPoint {
                month: first_of(2024, 2),
                total_price: 0.0,
            }
        );
    }

    #[test]
    fn test_forecast_months_follow_last_observation() {
        let table = SalesTable::new(vec![
            sale(2023, 10, 5, 100.0),
            sale(2023, 11, 5, 200.0),
            sale(2023, 12, 5, 300.0),
        ]);

        let forecast = forecast(&table, &ForecastOptions::default()).unwrap();
        let months: Vec<NaiveDate> = forecast.points.iter().map(|p| p.month).collect();
        assert_eq!(
            months,
            vec![
                first_of(2024, 1),
                first_of(2024, 2),
                first_of(2024, 3),
                first_of(2024, 4),
                first_of(2024, 5),
                first_of(2024, 6),
            ]
        );
        assert!(forecast.points[0].total_price > 300.0);
        assert!(forecast.points.windows(2).all(|w| w[1].total_price > w[0].total_price));
    }

    #[test]
    fn test_single_month_is_insufficient() {
        let table = SalesTable::new(vec![sale(2024, 1, 3, 10.0), sale(2024, 1, 9, 12.0)]);
        let err = forecast(&table, &ForecastOptions::default()).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_zero_periods_rejected() {
        let table = SalesTable::new(vec![sale(2024, 1, 3, 10.0), sale(2024, 2, 9, 12.0)]);
        let options = ForecastOptions {
            periods: 0,
            ..ForecastOptions::default()
        };
        assert!(matches!(
            forecast(&table, &options),
            Err(SalesError::InvalidParameter(_))
        ));
    }
}

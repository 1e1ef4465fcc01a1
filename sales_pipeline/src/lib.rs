//! # Sales Pipeline
//!
//! Load a tabular sales dataset, restrict it with a filter and compute the
//! analytical views a sales dashboard shows.
//!
//! ## Features
//!
//! - CSV and Excel loading with header trimming and strict validation
//! - Region/product/date filtering and previous-period baselines
//! - Headline KPIs with period-over-period delta
//! - Daily trend with rolling average, grouped aggregates and summaries
//! - Value histogram and Pearson correlation matrix
//! - Monthly forecast with Holt's linear trend model
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_pipeline::data::DataLoader;
//! use sales_pipeline::fields::{KeyField, NumericField};
//! use sales_pipeline::filter::{filter, previous_period, FilterSpec};
//! use sales_pipeline::forecast::{forecast, ForecastOptions};
//! use sales_pipeline::kpi::kpis;
//! use sales_pipeline::views::{group_aggregate, trend};
//!
//! # fn main() -> sales_pipeline::Result<()> {
//! let table = DataLoader::from_path("sales_data.csv")?;
//!
//! let spec = FilterSpec::for_table(&table).with_regions(["North", "South"]);
//! let filtered = filter(&table, &spec);
//!
//! let summary = kpis(&filtered, &previous_period(&table, &spec));
//! println!("{}", summary);
//!
//! let daily = trend(&filtered)?;
//! let by_region = group_aggregate(&filtered, KeyField::Region, NumericField::TotalPrice);
//! let outlook = forecast(&filtered, &ForecastOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod error;
pub mod fields;
pub mod filter;
pub mod forecast;
pub mod kpi;
pub mod models;
pub mod views;

// Re-export commonly used types
pub use crate::data::{DataLoader, SalesRecord, SalesTable};
pub use crate::error::{Result, SalesError};
pub use crate::fields::{KeyField, NumericField};
pub use crate::filter::FilterSpec;
pub use crate::forecast::{Forecast, ForecastOptions};
pub use crate::kpi::Kpis;
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::views::DerivedView;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

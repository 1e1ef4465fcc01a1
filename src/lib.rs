//! # Sales Lens
//!
//! Facade over the sales dashboard workspace.
//!
//! - [`math`]: rolling means, Holt smoothing, correlation and distribution summaries
//! - [`pipeline`]: loading, filtering, KPIs, derived views and forecasting
//! - [`report`]: configuration, rendering sinks, ZIP export and dashboard assembly
//!
//! ## Example
//!
//! ```
//! use sales_lens_workspace::pipeline::{filter, kpi, FilterSpec, SalesRecord, SalesTable};
//! use chrono::NaiveDate;
//!
//! let table = SalesTable::new(vec![SalesRecord {
//!     order_id: "1001".to_string(),
//!     date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
//!     region: "North".to_string(),
//!     product: "Pen".to_string(),
//!     quantity: 2,
//!     unit_price: 5.0,
//!     discount: 0.0,
//!     total_price: 10.0,
//! }]);
//!
//! let spec = FilterSpec::for_table(&table);
//! let filtered = filter::filter(&table, &spec);
//! let summary = kpi::kpis(&filtered, &filter::previous_period(&table, &spec));
//! assert_eq!(summary.total_orders, 1);
//! assert_eq!(summary.delta_pct, None);
//! ```

pub use sales_math as math;
pub use sales_pipeline as pipeline;
pub use sales_report as report;

/// Returns the version of the workspace facade.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

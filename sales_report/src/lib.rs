//! # Sales Report
//!
//! Turns the views computed by `sales_pipeline` into files and archives.
//!
//! - [`config`]: TOML configuration with environment and working-directory lookup
//! - [`sink`]: the [`RenderSink`] trait with CSV and JSON implementations
//! - [`export`]: ZIP bundling of rendered artifacts
//! - [`dashboard`]: KPIs plus per-view results for one filter
//!
//! ```rust,no_run
//! use sales_pipeline::{DataLoader, FilterSpec};
//! use sales_report::{Dashboard, ReportConfig};
//!
//! # fn main() -> sales_report::Result<()> {
//! let config = ReportConfig::load()?;
//! let table = DataLoader::from_path(&config.data_source_path)?;
//! let dashboard = Dashboard::build(&table, FilterSpec::for_table(&table), &config);
//!
//! let sink = config.dashboard.format.sink(&config.export_directory);
//! let summary = dashboard.export(sink.as_ref(), config.archive_path());
//! for outcome in &summary.outcomes {
//!     println!("{}", outcome);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod sink;

pub use crate::config::ReportConfig;
pub use crate::dashboard::{Dashboard, ExportSummary, RenderOutcome, RenderStatus};
pub use crate::error::{ReportError, Result};
pub use crate::sink::{CsvSink, JsonSink, RenderSink, SinkFormat};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! TOML-based configuration for dashboard reports.
//!
//! Every section is optional; missing keys fall back to defaults.
//!
//! Example configuration:
//! ```toml
//! data_source_path = "Product-Sales-Region.xlsx"
//! logo_path = "logo.png"
//! export_directory = "exports"
//!
//! [trend]
//! window = 7
//!
//! [forecast]
//! periods = 6
//! fill_missing_months = false
//!
//! [dashboard]
//! metric = "TotalPrice"
//! format = "csv"
//! archive_name = "dashboard.zip"
//! histogram_bins = 30
//! ```

use crate::error::{ReportError, Result};
use crate::sink::SinkFormat;
use sales_pipeline::views::{HISTOGRAM_BINS, ROLLING_WINDOW};
use sales_pipeline::{ForecastOptions, NumericField};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "SALES_LENS_CONFIG";

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "sales_lens.toml";

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Sales spreadsheet to load (CSV or Excel workbook).
    pub data_source_path: PathBuf,

    /// Logo bundled with exported reports when present.
    pub logo_path: Option<PathBuf>,

    /// Directory receiving rendered artifacts and the archive.
    pub export_directory: PathBuf,

    pub trend: TrendSettings,

    pub forecast: ForecastOptions,

    pub dashboard: DashboardSettings,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_source_path: PathBuf::from("Product-Sales-Region.xlsx"),
            logo_path: None,
            export_directory: PathBuf::from("exports"),
            trend: TrendSettings::default(),
            forecast: ForecastOptions::default(),
            dashboard: DashboardSettings::default(),
        }
    }
}

/// Trend view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSettings {
    /// Trailing window of the rolling average.
    pub window: usize,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            window: ROLLING_WINDOW,
        }
    }
}

/// Dashboard rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Numeric field shown by the region, box and histogram views.
    pub metric: NumericField,

    /// Artifact format.
    pub format: SinkFormat,

    /// File name of the ZIP archive inside the export directory.
    pub archive_name: String,

    pub histogram_bins: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            metric: NumericField::TotalPrice,
            format: SinkFormat::Csv,
            archive_name: "dashboard.zip".to_string(),
            histogram_bins: HISTOGRAM_BINS,
        }
    }
}

impl ReportConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReportError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: ReportConfig = toml::from_str(&content)?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from the default locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SALES_LENS_CONFIG`
    /// 2. `./sales_lens.toml`
    ///
    /// and falls back to defaults when neither exists.
    pub fn load() -> Result<Self> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        Ok(ReportConfig::default())
    }

    /// Load an explicitly requested file, or search the default locations.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Path of the ZIP archive written by an export.
    pub fn archive_path(&self) -> PathBuf {
        self.export_directory.join(&self.dashboard.archive_name)
    }

    /// Reject values no view can work with.
    pub fn validate(&self) -> Result<()> {
        if self.trend.window == 0 {
            return Err(ReportError::Config(
                "trend.window must be at least 1".to_string(),
            ));
        }
        if self.forecast.periods == 0 {
            return Err(ReportError::Config(
                "forecast.periods must be at least 1".to_string(),
            ));
        }
        if self.dashboard.histogram_bins == 0 {
            return Err(ReportError::Config(
                "dashboard.histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.dashboard.archive_name.trim().is_empty() {
            return Err(ReportError::Config(
                "dashboard.archive_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.trend.window, 7);
        assert_eq!(config.forecast.periods, 6);
        assert!(!config.forecast.fill_missing_months);
        assert_eq!(config.dashboard.metric, NumericField::TotalPrice);
        assert_eq!(config.archive_path(), PathBuf::from("exports/dashboard.zip"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
data_source_path = "q3.csv"
logo_path = "brand/logo.png"

[forecast]
fill_missing_months = true

[dashboard]
metric = "Quantity"
format = "json"
"#;

        let config: ReportConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.data_source_path, PathBuf::from("q3.csv"));
        assert_eq!(config.logo_path, Some(PathBuf::from("brand/logo.png")));
        assert_eq!(config.forecast.periods, 6);
        assert!(config.forecast.fill_missing_months);
        assert_eq!(config.dashboard.metric, NumericField::Quantity);
        assert_eq!(config.dashboard.format, SinkFormat::Json);
        assert_eq!(config.dashboard.archive_name, "dashboard.zip");
        assert_eq!(config.trend.window, 7);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "export_directory = \"out\"").unwrap();
        writeln!(file, "[trend]").unwrap();
        writeln!(file, "window = 3").unwrap();

        let config = ReportConfig::resolve(Some(file.path())).unwrap();
        assert_eq!(config.export_directory, PathBuf::from("out"));
        assert_eq!(config.trend.window, 3);
    }

    #[test]
    fn test_missing_and_invalid_files() {
        let missing = ReportConfig::from_file("does/not/exist.toml").unwrap_err();
        assert!(matches!(missing, ReportError::ConfigNotFound(_)));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[trend]\nwindow = 0").unwrap();
        let invalid = ReportConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(invalid, ReportError::Config(_)));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\nmetric = \"OrderID\"").unwrap();
        let unparsable = ReportConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(unparsable, ReportError::Toml(_)));
    }
}

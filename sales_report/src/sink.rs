//! Rendering sinks turning derived views into artifact files

use crate::error::{ReportError, Result};
use sales_pipeline::views::DerivedView;
use sales_pipeline::Kpis;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Artifact format of a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkFormat {
    #[default]
    Csv,
    Json,
}

impl SinkFormat {
    /// File extension of artifacts in this format
    pub fn extension(&self) -> &'static str {
        match self {
            SinkFormat::Csv => "csv",
            SinkFormat::Json => "json",
        }
    }

    /// Sink writing this format into `directory`
    pub fn sink<P: Into<PathBuf>>(&self, directory: P) -> Box<dyn RenderSink> {
        match self {
            SinkFormat::Csv => Box::new(CsvSink::new(directory)),
            SinkFormat::Json => Box::new(JsonSink::new(directory)),
        }
    }
}

impl fmt::Display for SinkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for SinkFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(SinkFormat::Csv),
            "json" => Ok(SinkFormat::Json),
            other => Err(ReportError::Config(format!("Unknown output format: {}", other))),
        }
    }
}

/// Consumer that turns a derived view into an artifact file
pub trait RenderSink {
    /// Write `view` as the artifact `name`, returning the written path
    fn render(&self, name: &str, view: &DerivedView) -> Result<PathBuf>;

    /// Write the headline metrics, returning the written path
    fn render_kpis(&self, kpis: &Kpis) -> Result<PathBuf>;
}

/// Header and rows of a view laid out as a flat table
#[derive(Debug, Clone, PartialEq)]
pub struct Tabular {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Lay out any view as a flat table
pub fn tabulate(view: &DerivedView) -> Tabular {
    let header = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();

    match view {
        DerivedView::Trend(trend) => Tabular {
            header: header(&["Date", "TotalPrice", "RollingAvg"]),
            rows: trend
                .points
                .iter()
                .map(|p| {
                    vec![
                        p.date.to_string(),
                        p.total_price.to_string(),
                        p.rolling_avg.to_string(),
                    ]
                })
                .collect(),
        },
        DerivedView::GroupAggregate(agg) => Tabular {
            header: header(&[agg.key.name(), agg.value.name()]),
            rows: agg
                .totals
                .iter()
                .map(|(key, total)| vec![key.clone(), total.to_string()])
                .collect(),
        },
        DerivedView::GroupSummary(summary) => Tabular {
            header: header(&[
                summary.key.name(),
                "Count",
                "Mean",
                "Median",
                "Min",
                "Max",
                "LowerQuartile",
                "UpperQuartile",
            ]),
            rows: summary
                .groups
                .iter()
                .map(|(key, s)| {
                    vec![
                        key.clone(),
                        s.count.to_string(),
                        s.mean.to_string(),
                        s.median.to_string(),
                        s.min.to_string(),
                        s.max.to_string(),
                        s.lower_quartile.to_string(),
                        s.upper_quartile.to_string(),
                    ]
                })
                .collect(),
        },
        DerivedView::Histogram(hist) => Tabular {
            header: header(&["BinStart", "BinEnd", "Count"]),
            rows: hist
                .histogram
                .edges
                .windows(2)
                .zip(&hist.histogram.counts)
                .map(|(edge, count)| {
                    vec![edge[0].to_string(), edge[1].to_string(), count.to_string()]
                })
                .collect(),
        },
        DerivedView::Correlation(matrix) => {
            let mut names = vec![String::new()];
            names.extend(matrix.fields.iter().map(|f| f.name().to_string()));
            Tabular {
                header: names,
                rows: matrix
                    .fields
                    .iter()
                    .zip(&matrix.values)
                    .map(|(field, row)| {
                        let mut line = vec![field.name().to_string()];
                        line.extend(row.iter().map(|v| cell(*v)));
                        line
                    })
                    .collect(),
            }
        }
        DerivedView::Forecast(forecast) => Tabular {
            header: header(&["Month", "TotalPrice", "Series"]),
            rows: forecast
                .history
                .iter()
                .map(|p| (p, "actual"))
                .chain(forecast.points.iter().map(|p| (p, "forecast")))
                .map(|(p, series)| {
                    vec![p.month.to_string(), p.total_price.to_string(), series.to_string()]
                })
                .collect(),
        },
    }
}

fn kpi_rows(kpis: &Kpis) -> Vec<[String; 2]> {
    vec![
        ["total_sales".to_string(), kpis.total_sales.to_string()],
        ["total_orders".to_string(), kpis.total_orders.to_string()],
        ["avg_discount".to_string(), cell(kpis.avg_discount)],
        ["delta_pct".to_string(), cell(kpis.delta_pct)],
        ["previous_sales".to_string(), kpis.previous_sales.to_string()],
    ]
}

/// Path of artifact `name` inside `directory`, creating the directory
fn artifact_path(directory: &Path, name: &str, format: SinkFormat) -> Result<PathBuf> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(ReportError::Sink(format!("Invalid artifact name '{}'", name)));
    }

    fs::create_dir_all(directory)?;
    Ok(directory.join(format!("{}.{}", name, format.extension())))
}

/// Writes one CSV file per view
#[derive(Debug, Clone)]
pub struct CsvSink {
    directory: PathBuf,
}

impl CsvSink {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl RenderSink for CsvSink {
    fn render(&self, name: &str, view: &DerivedView) -> Result<PathBuf> {
        let path = artifact_path(&self.directory, name, SinkFormat::Csv)?;
        let table = tabulate(view);

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&table.header)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        log::debug!("Wrote {} rows of {} to {}", table.rows.len(), view.kind(), path.display());
        Ok(path)
    }

    fn render_kpis(&self, kpis: &Kpis) -> Result<PathBuf> {
        let path = artifact_path(&self.directory, "kpis", SinkFormat::Csv)?;

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["Metric", "Value"])?;
        for row in kpi_rows(kpis) {
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(path)
    }
}

/// Writes one pretty-printed JSON document per view
#[derive(Debug, Clone)]
pub struct JsonSink {
    directory: PathBuf,
}

impl JsonSink {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf> {
        let path = artifact_path(&self.directory, name, SinkFormat::Json)?;
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, value)?;
        Ok(path)
    }
}

impl RenderSink for JsonSink {
    fn render(&self, name: &str, view: &DerivedView) -> Result<PathBuf> {
        let path = self.write(name, view)?;
        log::debug!("Wrote {} to {}", view.kind(), path.display());
        Ok(path)
    }

    fn render_kpis(&self, kpis: &Kpis) -> Result<PathBuf> {
        self.write("kpis", kpis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use sales_pipeline::fields::{KeyField, NumericField};
    use sales_pipeline::views::{CorrelationMatrix, GroupAggregate, Trend, TrendPoint};
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn by_region() -> DerivedView {
        let mut totals = BTreeMap::new();
        totals.insert("North".to_string(), 12.5);
        totals.insert("East".to_string(), 3.0);
        DerivedView::GroupAggregate(GroupAggregate {
            key: KeyField::Region,
            value: NumericField::TotalPrice,
            totals,
        })
    }

    #[test]
    fn test_tabulate_group_aggregate() {
        let table = tabulate(&by_region());
        assert_eq!(table.header, vec!["Region", "TotalPrice"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["East".to_string(), "3".to_string()],
                vec!["North".to_string(), "12.5".to_string()],
            ]
        );
    }

    #[test]
    fn test_tabulate_correlation_leaves_undefined_cells_empty() {
        let view = DerivedView::Correlation(CorrelationMatrix {
            fields: vec![NumericField::Quantity, NumericField::Discount],
            values: vec![vec![Some(1.0), None], vec![None, None]],
        });

        let table = tabulate(&view);
        assert_eq!(table.header, vec!["", "Quantity", "Discount"]);
        assert_eq!(table.rows[0], vec!["Quantity", "1", ""]);
        assert_eq!(table.rows[1], vec!["Discount", "", ""]);
    }

    #[test]
    fn test_csv_sink_writes_file() {
        let dir = tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("out"));

        let path = sink.render("region", &by_region()).unwrap();
        assert_eq!(path, dir.path().join("out").join("region.csv"));

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content, "Region,TotalPrice\nEast,3\nNorth,12.5\n");
    }

    #[test]
    fn test_json_sink_round_trips_view() {
        let dir = tempdir().unwrap();
        let sink = JsonSink::new(dir.path());
        let view = DerivedView::Trend(Trend {
            window: 7,
            points: vec![TrendPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                total_price: 10.0,
                rolling_avg: 10.0,
            }],
        });

        let path = sink.render("trend", &view).unwrap();
        let parsed: DerivedView = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed, view);
    }

    #[test]
    fn test_invalid_artifact_name() {
        let dir = tempdir().unwrap();
        let err = CsvSink::new(dir.path()).render("../escape", &by_region()).unwrap_err();
        assert!(matches!(err, ReportError::Sink(_)));
    }

    #[rstest]
    #[case("csv", Some(SinkFormat::Csv))]
    #[case(" JSON ", Some(SinkFormat::Json))]
    #[case("pdf", None)]
    fn test_format_from_str(#[case] raw: &str, #[case] expected: Option<SinkFormat>) {
        assert_eq!(raw.parse::<SinkFormat>().ok(), expected);
    }
}

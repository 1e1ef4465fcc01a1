//! Dashboard assembly: KPIs plus independently computed views

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::export;
use crate::sink::RenderSink;
use sales_pipeline::fields::{KeyField, NumericField};
use sales_pipeline::filter::{filter, previous_period};
use sales_pipeline::forecast::forecast;
use sales_pipeline::kpi::kpis;
use sales_pipeline::views::{self, DerivedView};
use sales_pipeline::{FilterSpec, Kpis, SalesError, SalesTable};
use std::fmt;
use std::path::{Path, PathBuf};

/// Names of the dashboard views, in display order
pub const VIEW_NAMES: [&str; 6] = ["trend", "region", "box", "heatmap", "forecast", "histogram"];

/// What happened to one view when rendering
#[derive(Debug)]
pub enum RenderStatus {
    Rendered(PathBuf),
    /// The view could not be computed for the current filter
    Skipped(String),
    Failed(ReportError),
}

/// Render status of a named view
#[derive(Debug)]
pub struct RenderOutcome {
    pub name: &'static str,
    pub status: RenderStatus,
}

impl RenderOutcome {
    pub fn path(&self) -> Option<&Path> {
        match &self.status {
            RenderStatus::Rendered(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for RenderOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            RenderStatus::Rendered(path) => {
                write!(f, "{:<10} ok      {}", self.name, path.display())
            }
            RenderStatus::Skipped(reason) => write!(f, "{:<10} skipped {}", self.name, reason),
            RenderStatus::Failed(err) => write!(f, "{:<10} failed  {}", self.name, err),
        }
    }
}

/// Result of a dashboard export
#[derive(Debug)]
pub struct ExportSummary {
    pub outcomes: Vec<RenderOutcome>,
    /// Archive path, or the bundling error; rendered files stay in place either way
    pub archive: Result<PathBuf>,
}

/// KPIs and views of one filter over one table
#[derive(Debug)]
pub struct Dashboard {
    rows: usize,
    metric: NumericField,
    kpis: Kpis,
    views: Vec<(&'static str, sales_pipeline::Result<DerivedView>)>,
    logo_path: Option<PathBuf>,
}

impl Dashboard {
    /// Filter `table` and compute every view; a failing view never stops the others
    pub fn build(table: &SalesTable, spec: FilterSpec, config: &ReportConfig) -> Self {
        let filtered = filter(table, &spec);
        let previous = previous_period(table, &spec);
        let metric = config.dashboard.metric;

        let views: Vec<(&'static str, sales_pipeline::Result<DerivedView>)> = vec![
            (
                "trend",
                views::trend_with_window(&filtered, config.trend.window).map(DerivedView::Trend),
            ),
            (
                "region",
                Ok(DerivedView::GroupAggregate(views::group_aggregate(
                    &filtered,
                    KeyField::Region,
                    metric,
                ))),
            ),
            (
                "box",
                views::group_summary(&filtered, KeyField::Product, metric)
                    .map(DerivedView::GroupSummary),
            ),
            (
                "heatmap",
                views::correlation(&filtered).map(DerivedView::Correlation),
            ),
            (
                "forecast",
                forecast(&filtered, &config.forecast).map(DerivedView::Forecast),
            ),
            (
                "histogram",
                views::histogram(&filtered, metric, config.dashboard.histogram_bins)
                    .map(DerivedView::Histogram),
            ),
        ];

        for (name, view) in &views {
            if let Err(err) = view {
                log::warn!("View '{}' unavailable: {}", name, err);
            }
        }

        let logo_path = config.logo_path.clone().filter(|path| {
            let exists = path.is_file();
            if !exists {
                log::warn!("Logo {} not found, reports go out without it", path.display());
            }
            exists
        });

        Self {
            kpis: kpis(&filtered, &previous),
            rows: filtered.len(),
            metric,
            views,
            logo_path,
        }
    }

    /// Number of rows left by the filter
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn kpis(&self) -> &Kpis {
        &self.kpis
    }

    /// Every view outcome, in display order
    pub fn views(
        &self,
    ) -> impl Iterator<Item = (&'static str, &sales_pipeline::Result<DerivedView>)> {
        self.views.iter().map(|(name, view)| (*name, view))
    }

    pub fn view(&self, name: &str) -> Option<&sales_pipeline::Result<DerivedView>> {
        self.views
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, view)| view)
    }

    /// Numeric field shown by the region, box and histogram views
    pub fn metric(&self) -> NumericField {
        self.metric
    }

    /// Send every computed view to `sink`
    pub fn render_all<S: RenderSink + ?Sized>(&self, sink: &S) -> Vec<RenderOutcome> {
        self.views
            .iter()
            .map(|(name, view)| {
                let status = match view {
                    Ok(view) => match sink.render(name, view) {
                        Ok(path) => RenderStatus::Rendered(path),
                        Err(err) => {
                            log::warn!("Rendering '{}' failed: {}", name, err);
                            RenderStatus::Failed(err)
                        }
                    },
                    Err(err) => RenderStatus::Skipped(skip_reason(err)),
                };
                RenderOutcome { name: *name, status }
            })
            .collect()
    }

    /// Render every view plus the KPIs and bundle the artifacts into `archive_path`
    pub fn export<S, P>(&self, sink: &S, archive_path: P) -> ExportSummary
    where
        S: RenderSink + ?Sized,
        P: AsRef<Path>,
    {
        let outcomes = self.render_all(sink);
        let mut artifacts: Vec<PathBuf> = outcomes
            .iter()
            .filter_map(|o| o.path().map(Path::to_path_buf))
            .collect();

        let archive = match sink.render_kpis(&self.kpis) {
            Ok(path) => {
                artifacts.push(path);
                artifacts.extend(self.logo_path.iter().cloned());
                export::bundle(&artifacts, archive_path)
            }
            Err(err) => Err(err),
        };

        if let Err(err) = &archive {
            log::warn!("Export failed: {}", err);
        }
        ExportSummary { outcomes, archive }
    }
}

fn skip_reason(err: &SalesError) -> String {
    match err {
        SalesError::InsufficientData(msg) => format!("not enough data ({})", msg),
        other => other.to_string(),
    }
}

//! sales_report CLI - Filter a sales spreadsheet and export dashboard views
//!
//! Usage:
//!   sales_report [--config <file>] [--data <file>] [--region <name>]...
//!                [--product <name>]... [--start <date>] [--end <date>]
//!                [--metric <field>] [--format csv|json] [--no-export]
//!
//! Examples:
//!   sales_report --data Product-Sales-Region.xlsx
//!   sales_report --region North --region South --start 2024-01-01 --format json

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use sales_pipeline::{DataLoader, FilterSpec, NumericField};
use sales_report::{Dashboard, RenderOutcome, ReportConfig, SinkFormat};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sales_report")]
#[command(about = "Compute sales KPIs and dashboard views, then export them")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sales spreadsheet (CSV or Excel), overrides data_source_path
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Keep only these regions (repeatable)
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Keep only these products (repeatable)
    #[arg(long = "product")]
    products: Vec<String>,

    /// Inclusive start date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Inclusive end date (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Numeric field shown by the region, box and histogram views
    #[arg(short, long)]
    metric: Option<NumericField>,

    /// Artifact format
    #[arg(short, long)]
    format: Option<FormatArg>,

    /// Render artifacts without bundling them into an archive
    #[arg(long)]
    no_export: bool,
}

#[derive(Clone, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for SinkFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => SinkFormat::Csv,
            FormatArg::Json => SinkFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match ReportConfig::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(data) = cli.data {
        config.data_source_path = data;
    }
    if let Some(metric) = cli.metric {
        config.dashboard.metric = metric;
    }
    if let Some(format) = cli.format {
        config.dashboard.format = format.into();
    }

    let table = match DataLoader::from_path(&config.data_source_path) {
        Ok(table) => table,
        Err(e) => {
            eprintln!(
                "Error loading '{}': {}",
                config.data_source_path.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    };

    let mut spec = FilterSpec::for_table(&table);
    if !cli.regions.is_empty() {
        spec = spec.with_regions(cli.regions);
    }
    if !cli.products.is_empty() {
        spec = spec.with_products(cli.products);
    }
    if let Some(start) = cli.start {
        spec = spec.with_start(start);
    }
    if let Some(end) = cli.end {
        spec = spec.with_end(end);
    }

    let dashboard = Dashboard::build(&table, spec, &config);
    println!(
        "{} of {} rows selected, metric {}",
        dashboard.rows(),
        table.len(),
        dashboard.metric()
    );
    println!("{}", dashboard.kpis());
    println!();

    let sink = config.dashboard.format.sink(&config.export_directory);
    if cli.no_export {
        print_outcomes(&dashboard.render_all(sink.as_ref()));
    } else {
        let summary = dashboard.export(sink.as_ref(), config.archive_path());
        print_outcomes(&summary.outcomes);
        match summary.archive {
            Ok(path) => println!("\nDashboard exported as {}", path.display()),
            Err(e) => eprintln!("\nExport failed: {}", e),
        }
    }

    ExitCode::SUCCESS
}

fn print_outcomes(outcomes: &[RenderOutcome]) {
    for outcome in outcomes {
        println!("{}", outcome);
    }
}

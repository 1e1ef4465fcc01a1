use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sales_pipeline::views::DerivedView;
use sales_pipeline::{DataLoader, FilterSpec, NumericField};
use sales_report::{Dashboard, JsonSink, RenderStatus, ReportConfig, ReportError, SinkFormat};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::{tempdir, NamedTempFile};
use zip::ZipArchive;

fn create_sample_data() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();

    writeln!(file, "Date,OrderID,Region,Product,Quantity,UnitPrice,Discount,TotalPrice").unwrap();
    writeln!(file, "2024-01-05,1,North,Pen,2,5.0,0.0,10.0").unwrap();
    writeln!(file, "2024-01-19,2,South,Ink,1,8.0,0.1,7.2").unwrap();
    writeln!(file, "2024-02-02,3,North,Ink,3,8.0,0.05,22.8").unwrap();
    writeln!(file, "2024-02-11,4,South,Pen,5,5.0,0.0,25.0").unwrap();
    writeln!(file, "2024-03-07,5,North,Pen,4,5.0,0.1,18.0").unwrap();
    writeln!(file, "2024-03-21,6,South,Ink,2,8.0,0.0,16.0").unwrap();

    file
}

fn archive_names(path: &Path) -> Vec<String> {
    let zip = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
    names.sort();
    names
}

#[test]
fn test_full_export_workflow() {
    let data = create_sample_data();
    let out = tempdir().unwrap();

    let mut config = ReportConfig::default();
    config.data_source_path = data.path().to_path_buf();
    config.export_directory = out.path().join("exports");

    let table = DataLoader::from_path(&config.data_source_path).unwrap();
    let dashboard = Dashboard::build(&table, FilterSpec::for_table(&table), &config);
    assert_eq!(dashboard.kpis().total_orders, 6);

    let sink = config.dashboard.format.sink(&config.export_directory);
    let summary = dashboard.export(sink.as_ref(), config.archive_path());

    assert!(summary
        .outcomes
        .iter()
        .all(|o| matches!(o.status, RenderStatus::Rendered(_))));
    let archive = summary.archive.unwrap();
    assert_eq!(
        archive_names(&archive),
        vec![
            "box.csv",
            "forecast.csv",
            "heatmap.csv",
            "histogram.csv",
            "kpis.csv",
            "region.csv",
            "trend.csv",
        ]
    );
}

#[test]
fn test_json_export_of_filtered_region() {
    let data = create_sample_data();
    let out = tempdir().unwrap();

    let mut config = ReportConfig::default();
    config.dashboard.metric = NumericField::Quantity;
    config.dashboard.format = SinkFormat::Json;

    let table = DataLoader::from_csv(data.path()).unwrap();
    let spec = FilterSpec::for_table(&table).with_regions(["North"]);
    let dashboard = Dashboard::build(&table, spec, &config);

    let outcomes = dashboard.render_all(&JsonSink::new(out.path()));
    let region = outcomes.iter().find(|o| o.name == "region").unwrap();
    let path = region.path().unwrap();

    let view: DerivedView = serde_json::from_reader(File::open(path).unwrap()).unwrap();
    match view {
        DerivedView::GroupAggregate(agg) => {
            assert_eq!(agg.value, NumericField::Quantity);
            assert_eq!(agg.totals.len(), 1);
            assert_eq!(agg.totals["North"], 9.0);
        }
        other => panic!("Expected a group aggregate, got {}", other.kind()),
    }
}

#[test]
fn test_failed_views_do_not_block_export() {
    let data = create_sample_data();
    let out = tempdir().unwrap();

    let table = DataLoader::from_csv(data.path()).unwrap();
    let spec = FilterSpec::for_table(&table).with_date_range(
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
    );
    let dashboard = Dashboard::build(&table, spec, &ReportConfig::default());
    assert_eq!(dashboard.rows(), 2);
    assert!(dashboard.kpis().delta_pct.is_some());

    let sink = SinkFormat::Csv.sink(out.path());
    let summary = dashboard.export(sink.as_ref(), out.path().join("dashboard.zip"));

    let skipped: Vec<&str> = summary
        .outcomes
        .iter()
        .filter(|o| matches!(o.status, RenderStatus::Skipped(_)))
        .map(|o| o.name)
        .collect();
    assert_eq!(skipped, vec!["forecast"]);
    assert!(archive_names(&summary.archive.unwrap()).contains(&"trend.csv".to_string()));
}

#[test]
fn test_missing_config_file() {
    let err = ReportConfig::resolve(Some(Path::new("no_such_config.toml"))).unwrap_err();
    assert!(matches!(err, ReportError::ConfigNotFound(_)));
}

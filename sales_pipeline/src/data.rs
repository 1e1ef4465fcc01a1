//! Sales table model and loaders

use crate::error::{Result, SalesError};
use crate::fields::{self, NumericField, REQUIRED_COLUMNS};
use calamine::{open_workbook_auto, Data, DataType as CellType, Reader};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

/// One row of the sales table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Order identifier; several line items may share one
    pub order_id: String,
    pub date: NaiveDate,
    pub region: String,
    pub product: String,
    pub quantity: u64,
    pub unit_price: f64,
    pub discount: f64,
    /// Authoritative line total, not recomputed from price and discount
    pub total_price: f64,
}

impl SalesRecord {
    /// Value of a numeric field
    pub fn value(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Quantity => self.quantity as f64,
            NumericField::UnitPrice => self.unit_price,
            NumericField::Discount => self.discount,
            NumericField::TotalPrice => self.total_price,
        }
    }

    /// Value of a categorical field
    pub fn key(&self, field: fields::KeyField) -> &str {
        match field {
            fields::KeyField::Region => &self.region,
            fields::KeyField::Product => &self.product,
        }
    }

    /// First day of the record's calendar month
    pub fn month(&self) -> NaiveDate {
        self.date.with_day(1).unwrap_or(self.date)
    }

    /// Calendar month as `YYYY-MM`
    pub fn month_label(&self) -> String {
        format!("{:04}-{:02}", self.date.year(), self.date.month())
    }
}

/// Ordered, immutable collection of sales records in source order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
}

impl SalesTable {
    /// Create a table from records, keeping their order
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    /// Get the records
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Iterate over the records
    pub fn iter(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Distinct regions in first-appearance order
    pub fn regions(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.region.as_str()))
    }

    /// Distinct products in first-appearance order
    pub fn products(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.product.as_str()))
    }

    /// Earliest and latest date, or `None` for an empty table
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Sum of total_price over every row
    pub fn total_sales(&self) -> f64 {
        self.records.iter().map(|r| r.total_price).sum()
    }

    /// All values of a numeric field, in row order
    pub fn column(&self, field: NumericField) -> Vec<f64> {
        self.records.iter().map(|r| r.value(field)).collect()
    }
}

impl FromIterator<SalesRecord> for SalesTable {
    fn from_iter<I: IntoIterator<Item = SalesRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SalesTable {
    type Item = &'a SalesRecord;
    type IntoIter = std::slice::Iter<'a, SalesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Parse a calendar date from the textual forms found in spreadsheets.
///
/// Datetimes are truncated to their date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Column-major rows as read from a source, before validation
#[derive(Debug, Default)]
struct RawColumns {
    order_id: Vec<Option<String>>,
    date: Vec<NaiveDate>,
    region: Vec<Option<String>>,
    product: Vec<Option<String>>,
    quantity: Vec<Option<f64>>,
    unit_price: Vec<Option<f64>>,
    discount: Vec<Option<f64>>,
    total_price: Vec<Option<f64>>,
}

impl RawColumns {
    fn into_table(self) -> Result<SalesTable> {
        let height = self.date.len();
        let mut records = Vec::with_capacity(height);

        for row in 0..height {
            let line = row + 1;
            let quantity = amount(self.quantity[row], fields::QUANTITY, line)?;
            if quantity.fract() != 0.0 {
                return Err(SalesError::Load(format!(
                    "Column '{}' row {}: quantity {} is not a whole number",
                    fields::QUANTITY,
                    line,
                    quantity
                )));
            }

            records.push(SalesRecord {
                order_id: text(&self.order_id[row], fields::ORDER_ID, line)?,
                date: self.date[row],
                region: text(&self.region[row], fields::REGION, line)?,
                product: text(&self.product[row], fields::PRODUCT, line)?,
                quantity: quantity as u64,
                unit_price: amount(self.unit_price[row], fields::UNIT_PRICE, line)?,
                discount: amount(self.discount[row], fields::DISCOUNT, line)?,
                total_price: amount(self.total_price[row], fields::TOTAL_PRICE, line)?,
            });
        }

        Ok(SalesTable::new(records))
    }
}

fn text(value: &Option<String>, column: &str, line: usize) -> Result<String> {
    value
        .clone()
        .ok_or_else(|| SalesError::Load(format!("Column '{}' row {}: missing value", column, line)))
}

fn amount(value: Option<f64>, column: &str, line: usize) -> Result<f64> {
    let value = value.ok_or_else(|| {
        SalesError::Load(format!(
            "Column '{}' row {}: missing or non-numeric value",
            column, line
        ))
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(SalesError::Load(format!(
            "Column '{}' row {}: expected a non-negative amount, got {}",
            column, line, value
        )));
    }
    Ok(value)
}

fn unparseable_date(raw: &str, line: usize) -> SalesError {
    SalesError::Load(format!(
        "Column '{}' row {}: cannot parse '{}' as a date",
        fields::DATE,
        line,
        raw
    ))
}

/// Data loader for sales tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a sales table, choosing the reader from the file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SalesTable> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Self::from_csv(path),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Self::from_excel(path),
            other => Err(SalesError::Load(format!(
                "Unsupported data source extension '{}' for {}",
                other,
                path.display()
            ))),
        }
    }

    /// Load a sales table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesTable> {
        let path = path.as_ref();
        let file = File::open(path)?;
        // Schema inference length 0 reads every column as Utf8, so identifiers
        // such as "00123" keep their leading zeros
        let df = CsvReader::new(file)
            .infer_schema(Some(0))
            .has_header(true)
            .finish()?;

        let table = Self::from_dataframe(df)?;
        log::info!("Loaded {} sales records from {}", table.len(), path.display());
        Ok(table)
    }

    /// Load a sales table from the first worksheet of an Excel workbook
    pub fn from_excel<P: AsRef<Path>>(path: P) -> Result<SalesTable> {
        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path)?;
        let sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| SalesError::Load(format!("{} has no worksheets", path.display())))?;
        let range = workbook.worksheet_range(&sheet)?;

        let mut rows = range
            .rows()
            .filter(|row| row.iter().any(|cell| !cell.is_empty()));
        let header: Vec<String> = rows
            .next()
            .ok_or_else(|| SalesError::Load(format!("Worksheet '{}' is empty", sheet)))?
            .iter()
            .map(|cell| cell.as_string().unwrap_or_default().trim().to_string())
            .collect();

        let index = |name: &str| -> Result<usize> {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| SalesError::Load(format!("Missing required column '{}'", name)))
        };
        let positions = REQUIRED_COLUMNS
            .iter()
            .map(|name| index(name))
            .collect::<Result<Vec<usize>>>()?;
        let [date_idx, id_idx, region_idx, product_idx, qty_idx, unit_idx, disc_idx, total_idx] =
            <[usize; 8]>::try_from(positions).map_err(|_| {
                SalesError::Load("Column layout could not be resolved".to_string())
            })?;

        let mut columns = RawColumns::default();
        for (row_idx, row) in rows.enumerate() {
            let line = row_idx + 1;
            let cell = |idx: usize| row.get(idx);

            columns.date.push(excel_date(cell(date_idx), line)?);
            columns.order_id.push(excel_text(cell(id_idx)));
            columns.region.push(excel_text(cell(region_idx)));
            columns.product.push(excel_text(cell(product_idx)));
            columns.quantity.push(excel_number(cell(qty_idx)));
            columns.unit_price.push(excel_number(cell(unit_idx)));
            columns.discount.push(excel_number(cell(disc_idx)));
            columns.total_price.push(excel_number(cell(total_idx)));
        }

        let table = columns.into_table()?;
        log::info!(
            "Loaded {} sales records from worksheet '{}' of {}",
            table.len(),
            sheet,
            path.display()
        );
        Ok(table)
    }

    /// Create a sales table from an existing DataFrame
    pub fn from_dataframe(mut df: DataFrame) -> Result<SalesTable> {
        let trimmed: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.trim().to_string())
            .collect();
        df.set_column_names(&trimmed)
            .map_err(|e| SalesError::Load(format!("Invalid column names: {}", e)))?;

        for name in REQUIRED_COLUMNS {
            if df.column(name).is_err() {
                return Err(SalesError::Load(format!(
                    "Missing required column '{}'",
                    name
                )));
            }
        }

        let columns = RawColumns {
            order_id: text_column(&df, fields::ORDER_ID)?,
            date: date_column(&df)?,
            region: text_column(&df, fields::REGION)?,
            product: text_column(&df, fields::PRODUCT)?,
            quantity: float_column(&df, fields::QUANTITY)?,
            unit_price: float_column(&df, fields::UNIT_PRICE)?,
            discount: float_column(&df, fields::DISCOUNT)?,
            total_price: float_column(&df, fields::TOTAL_PRICE)?,
        };

        columns.into_table()
    }
}

fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df.column(name)?.cast(&DataType::Utf8)?;
    Ok(series
        .utf8()?
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()))
        .collect())
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?;
    if column.dtype() == &DataType::Utf8 {
        return Ok(column
            .utf8()?
            .into_iter()
            .map(|v| v.and_then(|s| s.trim().parse::<f64>().ok()))
            .collect());
    }

    let series = column.cast(&DataType::Float64).map_err(|e| {
        SalesError::Load(format!("Column '{}' is not numeric: {}", name, e))
    })?;
    Ok(series.f64()?.into_iter().collect())
}

fn date_column(df: &DataFrame) -> Result<Vec<NaiveDate>> {
    let series = df.column(fields::DATE)?.cast(&DataType::Utf8)?;
    series
        .utf8()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            let raw = value.unwrap_or_default();
            parse_date(raw).ok_or_else(|| unparseable_date(raw, row + 1))
        })
        .collect()
}

fn excel_text(cell: Option<&Data>) -> Option<String> {
    match cell {
        None | Some(Data::Empty) => None,
        Some(other) => other.as_string().map(|s| s.trim().to_string()),
    }
}

fn excel_number(cell: Option<&Data>) -> Option<f64> {
    match cell {
        None | Some(Data::Empty) => None,
        Some(other) => other.as_f64(),
    }
}

fn excel_date(cell: Option<&Data>, line: usize) -> Result<NaiveDate> {
    let parsed = match cell {
        Some(Data::String(raw)) => parse_date(raw),
        None | Some(Data::Empty) => None,
        Some(other) => other.as_date(),
    };
    parsed.ok_or_else(|| {
        let raw = cell.map(|c| c.to_string()).unwrap_or_default();
        unparseable_date(&raw, line)
    })
}

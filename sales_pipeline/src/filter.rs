//! Region/product/date filtering of the sales table

use crate::data::{SalesRecord, SalesTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Active region/product/date-range restriction.
///
/// Region and product membership is case-sensitive exact match; both date
/// bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub regions: BTreeSet<String>,
    pub products: BTreeSet<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl FilterSpec {
    /// A filter that keeps every row of `table`.
    ///
    /// Region and product sets default to all distinct values present; the
    /// date range defaults to the table's min/max date (the whole calendar
    /// for an empty table).
    pub fn for_table(table: &SalesTable) -> Self {
        let (start_date, end_date) = table
            .date_range()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));

        Self {
            regions: table.regions().into_iter().collect(),
            products: table.products().into_iter().collect(),
            start_date,
            end_date,
        }
    }

    /// Restrict to the given regions
    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to the given products
    pub fn with_products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products = products.into_iter().map(Into::into).collect();
        self
    }

    /// Set the inclusive lower date bound
    pub fn with_start(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    /// Set the inclusive upper date bound
    pub fn with_end(mut self, end_date: NaiveDate) -> Self {
        self.end_date = end_date;
        self
    }

    /// Set both inclusive date bounds
    pub fn with_date_range(self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.with_start(start_date).with_end(end_date)
    }

    fn matches_categories(&self, record: &SalesRecord) -> bool {
        self.regions.contains(&record.region) && self.products.contains(&record.product)
    }

    /// Whether a row satisfies every predicate
    pub fn matches(&self, record: &SalesRecord) -> bool {
        self.matches_categories(record)
            && record.date >= self.start_date
            && record.date <= self.end_date
    }
}

/// Rows of `table` satisfying every predicate of `spec`, in source order
pub fn filter(table: &SalesTable, spec: &FilterSpec) -> SalesTable {
    let filtered: SalesTable = table.iter().filter(|r| spec.matches(r)).cloned().collect();
    log::debug!("Filter kept {} of {} rows", filtered.len(), table.len());
    filtered
}

/// Rows with the same region/product predicates but dated strictly before
/// `spec.start_date`; the baseline for period-over-period deltas
pub fn previous_period(table: &SalesTable, spec: &FilterSpec) -> SalesTable {
    table
        .iter()
        .filter(|r| spec.matches_categories(r) && r.date < spec.start_date)
        .cloned()
        .collect()
}

//! Headline metrics for a filtered table

use crate::data::SalesTable;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Headline metrics of the filtered table against its previous period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Sum of total_price
    pub total_sales: f64,
    /// Number of distinct order ids
    pub total_orders: usize,
    /// Mean discount, `None` when there are no rows
    pub avg_discount: Option<f64>,
    /// Percent change against the previous period, `None` when the previous
    /// period has zero sales
    pub delta_pct: Option<f64>,
    /// Sum of total_price over the previous period
    pub previous_sales: f64,
}

impl Kpis {
    /// Delta with a zero baseline reported as 0%
    pub fn delta_pct_or_zero(&self) -> f64 {
        self.delta_pct.unwrap_or(0.0)
    }
}

impl fmt::Display for Kpis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sales KPIs:")?;
        match self.delta_pct {
            Some(delta) => writeln!(
                f,
                "  Total Sales:  {:.2} ({:+.2}% vs previous period)",
                self.total_sales, delta
            )?,
            None => writeln!(
                f,
                "  Total Sales:  {:.2} (no previous period)",
                self.total_sales
            )?,
        }
        writeln!(f, "  Total Orders: {}", self.total_orders)?;
        match self.avg_discount {
            Some(discount) => write!(f, "  Avg Discount: {:.2}", discount),
            None => write!(f, "  Avg Discount: no data"),
        }
    }
}

/// Compute headline metrics for `filtered` against the `previous` period
pub fn kpis(filtered: &SalesTable, previous: &SalesTable) -> Kpis {
    let total_sales = filtered.total_sales();
    let total_orders = filtered
        .iter()
        .map(|r| r.order_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let avg_discount = if filtered.is_empty() {
        None
    } else {
        Some(filtered.iter().map(|r| r.discount).sum::<f64>() / filtered.len() as f64)
    };

    let previous_sales = previous.total_sales();
    let delta_pct = if previous_sales != 0.0 {
        Some((total_sales - previous_sales) / previous_sales * 100.0)
    } else {
        None
    };

    Kpis {
        total_sales,
        total_orders,
        avg_discount,
        delta_pct,
        previous_sales,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SalesRecord;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn sale(order_id: &str, total_price: f64, discount: f64) -> SalesRecord {
        SalesRecord {
            order_id: order_id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            region: "North".to_string(),
            product: "Pen".to_string(),
            quantity: 1,
            unit_price: total_price,
            discount,
            total_price,
        }
    }

    #[test]
    fn test_delta_against_previous_period() {
        let current = SalesTable::new(vec![sale("1", 100.0, 0.1), sale("2", 50.0, 0.3)]);
        let previous = SalesTable::new(vec![sale("0", 100.0, 0.0)]);
        let kpis = kpis(&current, &previous);

        assert_relative_eq!(kpis.total_sales, 150.0);
        assert_relative_eq!(kpis.delta_pct.unwrap(), 50.0);
        assert_relative_eq!(kpis.avg_discount.unwrap(), 0.2, epsilon = 1e-12);
        assert_eq!(kpis.total_orders, 2);
    }

    #[test]
    fn test_zero_baseline_has_no_delta() {
        let current = SalesTable::new(vec![sale("1", 150.0, 0.0)]);
        let kpis = kpis(&current, &SalesTable::default());

        assert_eq!(kpis.delta_pct, None);
        assert_eq!(kpis.delta_pct_or_zero(), 0.0);
    }

    #[test]
    fn test_distinct_orders() {
        let current = SalesTable::new(vec![
            sale("A-1", 10.0, 0.0),
            sale("A-1", 20.0, 0.0),
            sale("A-2", 5.0, 0.0),
        ]);
        assert_eq!(kpis(&current, &SalesTable::default()).total_orders, 2);
    }

    #[test]
    fn test_empty_table() {
        let kpis = kpis(&SalesTable::default(), &SalesTable::default());
        assert_eq!(kpis.total_orders, 0);
        assert_eq!(kpis.avg_discount, None);
        assert!(kpis.to_string().contains("no data"));
    }
}

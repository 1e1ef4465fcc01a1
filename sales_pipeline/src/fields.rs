//! Column names and field selectors for the sales table

use crate::error::SalesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DATE: &str = "Date";
pub const ORDER_ID: &str = "OrderID";
pub const REGION: &str = "Region";
pub const PRODUCT: &str = "Product";
pub const QUANTITY: &str = "Quantity";
pub const UNIT_PRICE: &str = "UnitPrice";
pub const DISCOUNT: &str = "Discount";
pub const TOTAL_PRICE: &str = "TotalPrice";

/// Every column a source must provide
pub const REQUIRED_COLUMNS: [&str; 8] = [
    DATE,
    ORDER_ID,
    REGION,
    PRODUCT,
    QUANTITY,
    UNIT_PRICE,
    DISCOUNT,
    TOTAL_PRICE,
];

/// Categorical column used as a grouping key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyField {
    Region,
    Product,
}

impl KeyField {
    /// Source column name
    pub fn name(&self) -> &'static str {
        match self {
            KeyField::Region => REGION,
            KeyField::Product => PRODUCT,
        }
    }
}

/// Numeric column; identifiers are never numeric fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NumericField {
    Quantity,
    UnitPrice,
    Discount,
    TotalPrice,
}

impl NumericField {
    /// All numeric fields in source column order
    pub const ALL: [NumericField; 4] = [
        NumericField::Quantity,
        NumericField::UnitPrice,
        NumericField::Discount,
        NumericField::TotalPrice,
    ];

    /// Source column name
    pub fn name(&self) -> &'static str {
        match self {
            NumericField::Quantity => QUANTITY,
            NumericField::UnitPrice => UNIT_PRICE,
            NumericField::Discount => DISCOUNT,
            NumericField::TotalPrice => TOTAL_PRICE,
        }
    }
}

impl fmt::Display for KeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyField {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "region" => Ok(KeyField::Region),
            "product" => Ok(KeyField::Product),
            other => Err(SalesError::InvalidParameter(format!(
                "Unknown key field: {}",
                other
            ))),
        }
    }
}

impl FromStr for NumericField {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "").as_str() {
            "quantity" => Ok(NumericField::Quantity),
            "unitprice" => Ok(NumericField::UnitPrice),
            "discount" => Ok(NumericField::Discount),
            "totalprice" => Ok(NumericField::TotalPrice),
            other => Err(SalesError::InvalidParameter(format!(
                "Unknown numeric field: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_column_and_snake_case_names() {
        assert_eq!("TotalPrice".parse::<NumericField>().unwrap(), NumericField::TotalPrice);
        assert_eq!("unit_price".parse::<NumericField>().unwrap(), NumericField::UnitPrice);
        assert_eq!(" Region ".parse::<KeyField>().unwrap(), KeyField::Region);
        assert!("OrderID".parse::<NumericField>().is_err());
    }

    #[test]
    fn display_matches_column_name() {
        assert_eq!(NumericField::Discount.to_string(), "Discount");
        assert_eq!(KeyField::Product.to_string(), "Product");
    }
}

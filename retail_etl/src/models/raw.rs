//! Raw input rows as read from the operator-supplied CSVs.
//!
//! Columns are matched by header name; missing columns and empty cells both
//! read as `None`. Unknown extra columns are ignored.

use serde::{Deserialize, Serialize};

use crate::models::Table;

/// `products.csv`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProduct {
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub energy_rating: Option<String>,
    pub price: Option<String>,
    pub manufacturing_cost: Option<String>,
    pub warranty_years: Option<String>,
    pub weight_kg: Option<String>,
    pub stock_quantity: Option<String>,
    pub launch_date: Option<String>,
}

/// `customers.csv`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCustomer {
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub country: Option<String>,
    pub segment: Option<String>,
    pub acquisition_date: Option<String>,
    pub lifetime_value: Option<String>,
}

/// `stores.csv`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStore {
    pub store_id: Option<String>,
    pub store_name: Option<String>,
    pub country: Option<String>,
    pub store_type: Option<String>,
    pub opening_date: Option<String>,
    pub size_sqm: Option<String>,
}

/// `sales.csv`: one line item per (transaction, product).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSale {
    pub transaction_id: Option<String>,
    pub product_id: Option<String>,
    pub customer_id: Option<String>,
    pub store_id: Option<String>,
    pub transaction_date: Option<String>,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
    pub discount: Option<String>,
    pub final_price: Option<String>,
    pub total_amount: Option<String>,
    pub payment_method: Option<String>,
}

/// `product_performance.csv`: one row per (product, month).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPerformance {
    pub product_id: Option<String>,
    pub year_month: Option<String>,
    pub energy_consumption_kwh: Option<String>,
    pub failure_rate: Option<String>,
    pub customer_satisfaction: Option<String>,
    pub return_rate: Option<String>,
    pub warranty_claims: Option<String>,
}

impl Table for RawProduct {
    const NAME: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &[
        "product_id",
        "product_name",
        "category",
        "subcategory",
        "energy_rating",
        "price",
        "manufacturing_cost",
        "warranty_years",
        "weight_kg",
        "stock_quantity",
        "launch_date",
    ];
}

impl Table for RawCustomer {
    const NAME: &'static str = "customers";
    const COLUMNS: &'static [&'static str] = &[
        "customer_id",
        "customer_name",
        "country",
        "segment",
        "acquisition_date",
        "lifetime_value",
    ];
}

impl Table for RawStore {
    const NAME: &'static str = "stores";
    const COLUMNS: &'static [&'static str] = &[
        "store_id",
        "store_name",
        "country",
        "store_type",
        "opening_date",
        "size_sqm",
    ];
}

impl Table for RawSale {
    const NAME: &'static str = "sales";
    const COLUMNS: &'static [&'static str] = &[
        "transaction_id",
        "product_id",
        "customer_id",
        "store_id",
        "transaction_date",
        "quantity",
        "unit_price",
        "discount",
        "final_price",
        "total_amount",
        "payment_method",
    ];
}

impl Table for RawPerformance {
    const NAME: &'static str = "product_performance";
    const COLUMNS: &'static [&'static str] = &[
        "product_id",
        "year_month",
        "energy_consumption_kwh",
        "failure_rate",
        "customer_satisfaction",
        "return_rate",
        "warranty_claims",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::assert_columns_match;

    #[test]
    fn columns_follow_field_order() {
        assert_columns_match(&RawProduct::default());
        assert_columns_match(&RawCustomer::default());
        assert_columns_match(&RawStore::default());
        assert_columns_match(&RawSale::default());
        assert_columns_match(&RawPerformance::default());
    }

    #[test]
    fn missing_columns_and_empty_cells_read_as_none() {
        let text = "product_id,price,extra\nP0001,,ignored\n";
        let mut r = csv::Reader::from_reader(text.as_bytes());
        let rows: Vec<RawProduct> = r.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_id.as_deref(), Some("P0001"));
        assert_eq!(rows[0].price, None);
        assert_eq!(rows[0].launch_date, None);
    }
}

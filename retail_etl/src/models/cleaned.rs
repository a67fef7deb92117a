//! Typed rows produced by the cleaner and persisted as `*_processed.csv`.
//!
//! Null cells are `None`: either the raw value was unparseable, or a derived
//! column could not be computed from its inputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Table;

/// Cleaned product row. `profit_margin` is derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanProduct {
    pub product_id: String,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub energy_rating: Option<String>,
    pub price: Option<f64>,
    pub manufacturing_cost: Option<f64>,
    pub warranty_years: Option<u32>,
    pub weight_kg: Option<f64>,
    pub stock_quantity: Option<i64>,
    pub launch_date: Option<NaiveDate>,
    /// Percent of price, rounded to 2 decimals.
    pub profit_margin: Option<f64>,
}

/// Cleaned customer row. `acquisition_year` / `acquisition_month` are derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanCustomer {
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub country: Option<String>,
    pub segment: Option<String>,
    pub acquisition_date: Option<NaiveDate>,
    pub lifetime_value: Option<f64>,
    pub acquisition_year: Option<i32>,
    pub acquisition_month: Option<u32>,
}

/// Cleaned store row. `opening_year` is derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanStore {
    pub store_id: String,
    pub store_name: Option<String>,
    pub country: Option<String>,
    pub store_type: Option<String>,
    pub opening_date: Option<NaiveDate>,
    pub size_sqm: Option<i64>,
    pub opening_year: Option<i32>,
}

/// Cleaned sales line item. The `transaction_*` date parts are derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanSale {
    pub transaction_id: String,
    pub product_id: Option<String>,
    pub customer_id: Option<String>,
    pub store_id: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub quantity: Option<i64>,
    pub unit_price: Option<f64>,
    pub discount: Option<f64>,
    pub final_price: Option<f64>,
    pub total_amount: Option<f64>,
    pub payment_method: Option<String>,
    pub transaction_year: Option<i32>,
    pub transaction_month: Option<u32>,
    pub transaction_day: Option<u32>,
}

/// Cleaned monthly performance row. `year` / `month` are split out of `year_month`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanPerformance {
    pub product_id: Option<String>,
    pub year_month: Option<String>,
    pub energy_consumption_kwh: Option<f64>,
    pub failure_rate: Option<f64>,
    pub customer_satisfaction: Option<f64>,
    pub return_rate: Option<f64>,
    pub warranty_claims: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl Table for CleanProduct {
    const NAME: &'static str = "products_processed";
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
        "profit_margin",
    ];
}

impl Table for CleanCustomer {
    const NAME: &'static str = "customers_processed";
    const COLUMNS: &'static [&'static str] = &[
        "customer_id",
        "customer_name",
        "country",
        "segment",
        "acquisition_date",
        "lifetime_value",
        "acquisition_year",
        "acquisition_month",
    ];
}

impl Table for CleanStore {
    const NAME: &'static str = "stores_processed";
    const COLUMNS: &'static [&'static str] = &[
        "store_id",
        "store_name",
        "country",
        "store_type",
        "opening_date",
        "size_sqm",
        "opening_year",
    ];
}

impl Table for CleanSale {
    const NAME: &'static str = "sales_processed";
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
        "transaction_year",
        "transaction_month",
        "transaction_day",
    ];
}

impl Table for CleanPerformance {
    const NAME: &'static str = "performance_processed";
    const COLUMNS: &'static [&'static str] = &[
        "product_id",
        "year_month",
        "energy_consumption_kwh",
        "failure_rate",
        "customer_satisfaction",
        "return_rate",
        "warranty_claims",
        "year",
        "month",
    ];
}

//! Star-schema rows: four dimensions and two facts.
//!
//! Column names and key types here are the contract with downstream readers,
//! which join on `date_key`, `product_key`, `customer_key` and `store_key`.
//! Every surrogate key column comes first in its table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::keys::{DateKey, KeyLookup, SurrogateKey};
use crate::models::Table;

/// An entity dimension row: carries a surrogate key and the natural key it replaces.
pub trait DimensionRow: Table {
    /// Surrogate key column name (e.g. `"product_key"`).
    const KEY_COLUMN: &'static str;
    /// Natural key column name (e.g. `"product_id"`).
    const NATURAL_KEY_COLUMN: &'static str;

    /// Surrogate key of this row.
    fn surrogate_key(&self) -> SurrogateKey;
    /// Natural identifier of this row.
    fn natural_key(&self) -> &str;
}

/// `dim_date`: one row per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRow {
    pub date_id: SurrogateKey,
    pub date: NaiveDate,
    pub day: u32,
    pub month: u32,
    pub quarter: u32,
    pub year: i32,
    /// Monday = 0 … Sunday = 6.
    pub day_of_week: u32,
    pub day_name: String,
    pub month_name: String,
    pub is_weekend: bool,
    pub date_key: DateKey,
}

/// `dim_product`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimProduct {
    pub product_key: SurrogateKey,
    pub product_id: String,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub energy_rating: Option<String>,
    pub price: Option<f64>,
    pub manufacturing_cost: Option<f64>,
    pub warranty_years: Option<u32>,
    pub weight_kg: Option<f64>,
    pub profit_margin: Option<f64>,
    pub launch_date: Option<NaiveDate>,
}

/// `dim_customer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimCustomer {
    pub customer_key: SurrogateKey,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub country: Option<String>,
    pub segment: Option<String>,
    pub acquisition_date: Option<NaiveDate>,
    pub lifetime_value: Option<f64>,
    pub acquisition_year: Option<i32>,
    pub acquisition_month: Option<u32>,
}

/// `dim_store`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimStore {
    pub store_key: SurrogateKey,
    pub store_id: String,
    pub store_name: Option<String>,
    pub country: Option<String>,
    pub store_type: Option<String>,
    pub opening_date: Option<NaiveDate>,
    pub size_sqm: Option<i64>,
    pub opening_year: Option<i32>,
}

/// `fact_sales`: one row per (transaction, product) line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesFact {
    pub sales_key: SurrogateKey,
    pub transaction_id: String,
    pub date_key: KeyLookup<DateKey>,
    pub product_key: KeyLookup<SurrogateKey>,
    pub customer_key: KeyLookup<SurrogateKey>,
    pub store_key: KeyLookup<SurrogateKey>,
    pub quantity: Option<i64>,
    pub unit_price: Option<f64>,
    pub discount: Option<f64>,
    pub final_price: Option<f64>,
    pub total_amount: Option<f64>,
    pub payment_method: Option<String>,
}

/// `fact_performance`: one row per (product, month); `date_key` is the first of the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceFact {
    pub performance_key: SurrogateKey,
    pub date_key: KeyLookup<DateKey>,
    pub product_key: KeyLookup<SurrogateKey>,
    pub energy_consumption_kwh: Option<f64>,
    pub failure_rate: Option<f64>,
    pub customer_satisfaction: Option<f64>,
    pub return_rate: Option<f64>,
    pub warranty_claims: Option<i64>,
}

impl Table for DateRow {
    const NAME: &'static str = "dim_date";
    const COLUMNS: &'static [&'static str] = &[
        "date_id",
        "date",
        "day",
        "month",
        "quarter",
        "year",
        "day_of_week",
        "day_name",
        "month_name",
        "is_weekend",
        "date_key",
    ];
}

impl Table for DimProduct {
    const NAME: &'static str = "dim_product";
    const COLUMNS: &'static [&'static str] = &[
        "product_key",
        "product_id",
        "product_name",
        "category",
        "subcategory",
        "energy_rating",
        "price",
        "manufacturing_cost",
        "warranty_years",
        "weight_kg",
        "profit_margin",
        "launch_date",
    ];
}

impl Table for DimCustomer {
    const NAME: &'static str = "dim_customer";
    const COLUMNS: &'static [&'static str] = &[
        "customer_key",
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

impl Table for DimStore {
    const NAME: &'static str = "dim_store";
    const COLUMNS: &'static [&'static str] = &[
        "store_key",
        "store_id",
        "store_name",
        "country",
        "store_type",
        "opening_date",
        "size_sqm",
        "opening_year",
    ];
}

impl Table for SalesFact {
    const NAME: &'static str = "fact_sales";
    const COLUMNS: &'static [&'static str] = &[
        "sales_key",
        "transaction_id",
        "date_key",
        "product_key",
        "customer_key",
        "store_key",
        "quantity",
        "unit_price",
        "discount",
        "final_price",
        "total_amount",
        "payment_method",
    ];
}

impl Table for PerformanceFact {
    const NAME: &'static str = "fact_performance";
    const COLUMNS: &'static [&'static str] = &[
        "performance_key",
        "date_key",
        "product_key",
        "energy_consumption_kwh",
        "failure_rate",
        "customer_satisfaction",
        "return_rate",
        "warranty_claims",
    ];
}

impl DimensionRow for DimProduct {
    const KEY_COLUMN: &'static str = "product_key";
    const NATURAL_KEY_COLUMN: &'static str = "product_id";

    fn surrogate_key(&self) -> SurrogateKey {
        self.product_key
    }
    fn natural_key(&self) -> &str {
        &self.product_id
    }
}

impl DimensionRow for DimCustomer {
    const KEY_COLUMN: &'static str = "customer_key";
    const NATURAL_KEY_COLUMN: &'static str = "customer_id";

    fn surrogate_key(&self) -> SurrogateKey {
        self.customer_key
    }
    fn natural_key(&self) -> &str {
        &self.customer_id
    }
}

impl DimensionRow for DimStore {
    const KEY_COLUMN: &'static str = "store_key";
    const NATURAL_KEY_COLUMN: &'static str = "store_id";

    fn surrogate_key(&self) -> SurrogateKey {
        self.store_key
    }
    fn natural_key(&self) -> &str {
        &self.store_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::assert_columns_match;

    fn k(n: u64) -> SurrogateKey {
        SurrogateKey::new(n)
    }

    #[test]
    fn columns_follow_field_order() {
        let date = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        assert_columns_match(&DateRow {
            date_id: k(1),
            date,
            day: 1,
            month: 1,
            quarter: 1,
            year: 2022,
            day_of_week: 5,
            day_name: "Saturday".into(),
            month_name: "January".into(),
            is_weekend: true,
            date_key: DateKey::from_date(date).unwrap(),
        });
        assert_columns_match(&DimProduct {
            product_key: k(1),
            product_id: "P1".into(),
            product_name: None,
            category: None,
            subcategory: None,
            energy_rating: None,
            price: None,
            manufacturing_cost: None,
            warranty_years: None,
            weight_kg: None,
            profit_margin: None,
            launch_date: None,
        });
        assert_columns_match(&DimCustomer {
            customer_key: k(1),
            customer_id: "C1".into(),
            customer_name: None,
            country: None,
            segment: None,
            acquisition_date: None,
            lifetime_value: None,
            acquisition_year: None,
            acquisition_month: None,
        });
        assert_columns_match(&DimStore {
            store_key: k(1),
            store_id: "S1".into(),
            store_name: None,
            country: None,
            store_type: None,
            opening_date: None,
            size_sqm: None,
            opening_year: None,
        });
        assert_columns_match(&SalesFact {
            sales_key: k(1),
            transaction_id: "T1".into(),
            date_key: KeyLookup::Unmatched,
            product_key: KeyLookup::Unmatched,
            customer_key: KeyLookup::Unmatched,
            store_key: KeyLookup::Unmatched,
            quantity: None,
            unit_price: None,
            discount: None,
            final_price: None,
            total_amount: None,
            payment_method: None,
        });
        assert_columns_match(&PerformanceFact {
            performance_key: k(1),
            date_key: KeyLookup::Unmatched,
            product_key: KeyLookup::Unmatched,
            energy_consumption_kwh: None,
            failure_rate: None,
            customer_satisfaction: None,
            return_rate: None,
            warranty_claims: None,
        });
    }

    #[test]
    fn dimension_keys_lead_their_tables() {
        assert_eq!(DimProduct::COLUMNS[0], DimProduct::KEY_COLUMN);
        assert_eq!(DimCustomer::COLUMNS[0], DimCustomer::KEY_COLUMN);
        assert_eq!(DimStore::COLUMNS[0], DimStore::KEY_COLUMN);
        assert_eq!(DimProduct::COLUMNS[1], DimProduct::NATURAL_KEY_COLUMN);
    }
}

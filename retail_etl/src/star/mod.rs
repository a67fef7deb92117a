//! Star schema builder: cleaned tables -> dimensions with surrogate keys and
//! facts with resolved foreign keys.
//!
//! Keys are assigned from a fresh [`KeyMap`](crate::keys::KeyMap) in every
//! build, so identical inputs always give identical tables.

pub mod date_dim;
pub mod dimension;
pub mod fact;

use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use crate::clean::CleanTables;
use crate::keys::KeyLookup;
use crate::models::Table;
use crate::models::star::{
    DateRow, DimCustomer, DimProduct, DimStore, DimensionRow, PerformanceFact, SalesFact,
};
pub use date_dim::{DateDimension, build_date_dimension};
pub use dimension::{
    Dimension, NaturalKey, build_customer_dimension, build_dimension, build_product_dimension,
    build_store_dimension,
};
pub use fact::{SalesDimensions, build_performance_fact, build_sales_fact};

/// All six star-schema tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarSchema {
    pub date: DateDimension,
    pub product: Dimension<DimProduct>,
    pub customer: Dimension<DimCustomer>,
    pub store: Dimension<DimStore>,
    pub sales: Vec<SalesFact>,
    pub performance: Vec<PerformanceFact>,
}

impl StarSchema {
    /// Row count per artifact, in persistence order.
    pub fn row_counts(&self) -> IndexMap<&'static str, usize> {
        IndexMap::from([
            (DateRow::NAME, self.date.len()),
            (DimProduct::NAME, self.product.len()),
            (DimCustomer::NAME, self.customer.len()),
            (DimStore::NAME, self.store.len()),
            (SalesFact::NAME, self.sales.len()),
            (PerformanceFact::NAME, self.performance.len()),
        ])
    }
}

/// Outcome of one build: row counts, unmatched foreign keys and duplicate
/// natural keys. Keys are `"<table>"` or `"<table>.<column>"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub rows: IndexMap<&'static str, usize>,
    pub unmatched: IndexMap<String, usize>,
    pub duplicates: IndexMap<String, usize>,
}

impl BuildReport {
    fn collect(schema: &StarSchema) -> Self {
        let sales = &schema.sales;
        let performance = &schema.performance;
        let unmatched = IndexMap::from([
            (
                "fact_sales.date_key".to_string(),
                unmatched_count(sales.iter().map(|s| &s.date_key)),
            ),
            (
                "fact_sales.product_key".to_string(),
                unmatched_count(sales.iter().map(|s| &s.product_key)),
            ),
            (
                "fact_sales.customer_key".to_string(),
                unmatched_count(sales.iter().map(|s| &s.customer_key)),
            ),
            (
                "fact_sales.store_key".to_string(),
                unmatched_count(sales.iter().map(|s| &s.store_key)),
            ),
            (
                "fact_performance.date_key".to_string(),
                unmatched_count(performance.iter().map(|p| &p.date_key)),
            ),
            (
                "fact_performance.product_key".to_string(),
                unmatched_count(performance.iter().map(|p| &p.product_key)),
            ),
        ]);

        let mut duplicates = IndexMap::new();
        duplicates.insert(natural_column::<DimProduct>(), schema.product.keys.duplicates());
        duplicates.insert(natural_column::<DimCustomer>(), schema.customer.keys.duplicates());
        duplicates.insert(natural_column::<DimStore>(), schema.store.keys.duplicates());

        Self {
            rows: schema.row_counts(),
            unmatched,
            duplicates,
        }
    }

    /// Total unmatched foreign keys across both facts.
    pub fn total_unmatched(&self) -> usize {
        self.unmatched.values().sum()
    }
}

fn unmatched_count<'a, K: Copy + 'a>(keys: impl Iterator<Item = &'a KeyLookup<K>>) -> usize {
    keys.filter(|k| k.is_unmatched()).count()
}

fn natural_column<R: DimensionRow>() -> String {
    format!("{}.{}", R::NAME, R::NATURAL_KEY_COLUMN)
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut section = |title: &str, entries: &mut dyn Iterator<Item = (&str, usize)>| -> fmt::Result {
            if !first {
                writeln!(f)?;
            }
            first = false;
            writeln!(f, "{title}")?;
            writeln!(f, "{}", "-".repeat(title.len()))?;
            for (name, n) in entries {
                writeln!(f, "{name:<32} {n:>8}")?;
            }
            Ok(())
        };

        section("Rows", &mut self.rows.iter().map(|(k, v)| (*k, *v)))?;

        let mut unmatched = self
            .unmatched
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(k, v)| (k.as_str(), *v))
            .peekable();
        if unmatched.peek().is_some() {
            section("Unmatched keys", &mut unmatched)?;
        }

        let mut duplicates = self
            .duplicates
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(k, v)| (k.as_str(), *v))
            .peekable();
        if duplicates.peek().is_some() {
            section("Duplicate natural keys", &mut duplicates)?;
        }
        Ok(())
    }
}

/// Build the full star schema over the date range `start..=end`.
pub fn build_star_schema(
    clean: &CleanTables,
    start: NaiveDate,
    end: NaiveDate,
) -> (StarSchema, BuildReport) {
    let date = build_date_dimension(start, end);
    let product = build_product_dimension(&clean.products);
    let customer = build_customer_dimension(&clean.customers);
    let store = build_store_dimension(&clean.stores);

    let sales = build_sales_fact(
        &clean.sales,
        SalesDimensions {
            date: &date,
            product: &product,
            customer: &customer,
            store: &store,
        },
    );
    let performance = build_performance_fact(&clean.performance, &date, &product);

    let schema = StarSchema {
        date,
        product,
        customer,
        store,
        sales,
        performance,
    };
    let report = BuildReport::collect(&schema);

    for (column, n) in report.unmatched.iter().filter(|(_, n)| **n > 0) {
        warn!(%column, unmatched = n, "foreign keys left null");
    }
    info!(
        dates = schema.date.len(),
        products = schema.product.len(),
        customers = schema.customer.len(),
        stores = schema.store.len(),
        sales = schema.sales.len(),
        performance = schema.performance.len(),
        "built star schema"
    );
    (schema, report)
}

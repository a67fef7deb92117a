//! Data cleaner: raw rows -> typed, standardized rows.
//!
//! Each `clean_*` function preserves row count and order. The rules per table:
//!
//! | table       | fills                                              | text                         | derived                          |
//! |-------------|----------------------------------------------------|------------------------------|----------------------------------|
//! | products    | warranty_years=1, weight_kg=0.0, stock_quantity=0  | trim name/subcategory, UPPER category | profit_margin               |
//! | customers   | lifetime_value=0.0                                 | trim name/segment, UPPER country | acquisition_year/month       |
//! | stores      | size_sqm=0                                         | trim name/type, UPPER country | opening_year                    |
//! | sales       | quantity=1, discount=0.0                           | trim payment_method          | transaction_year/month/day, total_amount if missing |
//! | performance | energy/failure/return=0.0, satisfaction=3.0, claims=0 | (none)                       | year, month from year_month      |
//!
//! Unparseable values become `None` and are counted in [`CleanReport`].

mod coerce;

use chrono::Datelike;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use crate::models::Table;
use crate::models::cleaned::{CleanCustomer, CleanPerformance, CleanProduct, CleanSale, CleanStore};
use crate::models::raw::{RawCustomer, RawPerformance, RawProduct, RawSale, RawStore};
use coerce::{Coercer, round2};

/// Valid range for `customer_satisfaction`.
pub const SATISFACTION_RANGE: std::ops::RangeInclusive<f64> = 1.0..=5.0;

/// The five raw input tables.
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub products: Vec<RawProduct>,
    pub customers: Vec<RawCustomer>,
    pub stores: Vec<RawStore>,
    pub sales: Vec<RawSale>,
    pub performance: Vec<RawPerformance>,
}

/// The five cleaned tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanTables {
    pub products: Vec<CleanProduct>,
    pub customers: Vec<CleanCustomer>,
    pub stores: Vec<CleanStore>,
    pub sales: Vec<CleanSale>,
    pub performance: Vec<CleanPerformance>,
}

/// Output of one table cleaner.
#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned<T> {
    /// Cleaned rows, same order as the input.
    pub rows: Vec<T>,
    /// Present values that could not be parsed and were set to null.
    pub coerced: usize,
}

/// Per-table row and coercion counts, keyed by table name in pipeline order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanReport {
    pub tables: IndexMap<&'static str, TableCleanStats>,
}

/// Row and coercion counts for one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCleanStats {
    pub rows: usize,
    pub coerced: usize,
}

impl CleanReport {
    fn record<T: Table>(&mut self, cleaned: &Cleaned<T>) {
        let stats = TableCleanStats {
            rows: cleaned.rows.len(),
            coerced: cleaned.coerced,
        };
        if stats.coerced > 0 {
            warn!(
                table = T::NAME,
                coerced = stats.coerced,
                "unparseable values set to null"
            );
        }
        info!(table = T::NAME, rows = stats.rows, "cleaned table");
        self.tables.insert(T::NAME, stats);
    }

    /// Total coerced values across all tables.
    pub fn total_coerced(&self) -> usize {
        self.tables.values().map(|s| s.coerced).sum()
    }
}

pub fn clean_products(rows: Vec<RawProduct>) -> Cleaned<CleanProduct> {
    let mut c = Coercer::default();
    let rows = rows
        .into_iter()
        .map(|r| {
            let price = c.number(r.price.as_deref());
            let manufacturing_cost = c.number(r.manufacturing_cost.as_deref());
            let profit_margin = match (price, manufacturing_cost) {
                (Some(p), Some(cost)) if p != 0.0 => Some(round2((p - cost) / p * 100.0)),
                _ => None,
            };
            CleanProduct {
                product_id: c.id(r.product_id.as_deref()),
                product_name: c.trimmed(r.product_name.as_deref()),
                category: c.upper(r.category.as_deref()),
                subcategory: c.trimmed(r.subcategory.as_deref()),
                energy_rating: c.trimmed(r.energy_rating.as_deref()),
                price,
                manufacturing_cost,
                warranty_years: c.count_or(r.warranty_years.as_deref(), 1),
                weight_kg: c.number_or(r.weight_kg.as_deref(), 0.0),
                stock_quantity: c.integer_or(r.stock_quantity.as_deref(), 0),
                launch_date: c.date(r.launch_date.as_deref()),
                profit_margin,
            }
        })
        .collect();
    Cleaned {
        rows,
        coerced: c.coerced,
    }
}

pub fn clean_customers(rows: Vec<RawCustomer>) -> Cleaned<CleanCustomer> {
    let mut c = Coercer::default();
    let rows = rows
        .into_iter()
        .map(|r| {
            let acquisition_date = c.date(r.acquisition_date.as_deref());
            CleanCustomer {
                customer_id: c.id(r.customer_id.as_deref()),
                customer_name: c.trimmed(r.customer_name.as_deref()),
                country: c.upper(r.country.as_deref()),
                segment: c.trimmed(r.segment.as_deref()),
                acquisition_date,
                lifetime_value: c.number_or(r.lifetime_value.as_deref(), 0.0),
                acquisition_year: acquisition_date.map(|d| d.year()),
                acquisition_month: acquisition_date.map(|d| d.month()),
            }
        })
        .collect();
    Cleaned {
        rows,
        coerced: c.coerced,
    }
}

pub fn clean_stores(rows: Vec<RawStore>) -> Cleaned<CleanStore> {
    let mut c = Coercer::default();
    let rows = rows
        .into_iter()
        .map(|r| {
            let opening_date = c.date(r.opening_date.as_deref());
            CleanStore {
                store_id: c.id(r.store_id.as_deref()),
                store_name: c.trimmed(r.store_name.as_deref()),
                country: c.upper(r.country.as_deref()),
                store_type: c.trimmed(r.store_type.as_deref()),
                opening_date,
                size_sqm: c.integer_or(r.size_sqm.as_deref(), 0),
                opening_year: opening_date.map(|d| d.year()),
            }
        })
        .collect();
    Cleaned {
        rows,
        coerced: c.coerced,
    }
}

pub fn clean_sales(rows: Vec<RawSale>) -> Cleaned<CleanSale> {
    let mut c = Coercer::default();
    let rows = rows
        .into_iter()
        .map(|r| {
            let transaction_date = c.date(r.transaction_date.as_deref());
            let quantity = c.integer_or(r.quantity.as_deref(), 1);
            let final_price = c.number(r.final_price.as_deref());
            let total_amount = if coerce::present(r.total_amount.as_deref()).is_some() {
                c.number(r.total_amount.as_deref())
            } else {
                final_price
                    .zip(quantity)
                    .map(|(price, qty)| round2(price * qty as f64))
            };
            CleanSale {
                transaction_id: c.id(r.transaction_id.as_deref()),
                product_id: c.trimmed(r.product_id.as_deref()),
                customer_id: c.trimmed(r.customer_id.as_deref()),
                store_id: c.trimmed(r.store_id.as_deref()),
                transaction_date,
                quantity,
                unit_price: c.number(r.unit_price.as_deref()),
                discount: c.number_or(r.discount.as_deref(), 0.0),
                final_price,
                total_amount,
                payment_method: c.trimmed(r.payment_method.as_deref()),
                transaction_year: transaction_date.map(|d| d.year()),
                transaction_month: transaction_date.map(|d| d.month()),
                transaction_day: transaction_date.map(|d| d.day()),
            }
        })
        .collect();
    Cleaned {
        rows,
        coerced: c.coerced,
    }
}

pub fn clean_performance(rows: Vec<RawPerformance>) -> Cleaned<CleanPerformance> {
    let mut c = Coercer::default();
    let rows = rows
        .into_iter()
        .map(|r| {
            let ym = c.year_month(r.year_month.as_deref());
            let satisfaction = c.number_or(r.customer_satisfaction.as_deref(), 3.0);
            CleanPerformance {
                product_id: c.trimmed(r.product_id.as_deref()),
                year_month: c.trimmed(r.year_month.as_deref()),
                energy_consumption_kwh: c.number_or(r.energy_consumption_kwh.as_deref(), 0.0),
                failure_rate: c.number_or(r.failure_rate.as_deref(), 0.0),
                customer_satisfaction: c.bounded(satisfaction, SATISFACTION_RANGE),
                return_rate: c.number_or(r.return_rate.as_deref(), 0.0),
                warranty_claims: c.integer_or(r.warranty_claims.as_deref(), 0),
                year: ym.map(|(y, _)| y),
                month: ym.map(|(_, m)| m),
            }
        })
        .collect();
    Cleaned {
        rows,
        coerced: c.coerced,
    }
}

/// Clean all five tables and report per-table counts.
pub fn clean_all(raw: RawTables) -> (CleanTables, CleanReport) {
    let mut report = CleanReport::default();

    let products = clean_products(raw.products);
    report.record(&products);
    let customers = clean_customers(raw.customers);
    report.record(&customers);
    let stores = clean_stores(raw.stores);
    report.record(&stores);
    let sales = clean_sales(raw.sales);
    report.record(&sales);
    let performance = clean_performance(raw.performance);
    report.record(&performance);

    let tables = CleanTables {
        products: products.rows,
        customers: customers.rows,
        stores: stores.rows,
        sales: sales.rows,
        performance: performance.rows,
    };
    (tables, report)
}

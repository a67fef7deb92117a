use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::keys::{DateKey, KeyLookup, SurrogateKey};
use crate::models::star::{
    DateRow, DimCustomer, DimProduct, DimStore, DimensionRow, PerformanceFact, SalesFact,
};
use crate::star::StarSchema;

/// A sales fact with its dimension rows attached; `None` where the key is unmatched.
#[derive(Debug, Clone, Copy)]
pub struct SalesLine<'a> {
    pub fact: &'a SalesFact,
    pub date: Option<&'a DateRow>,
    pub product: Option<&'a DimProduct>,
    pub customer: Option<&'a DimCustomer>,
    pub store: Option<&'a DimStore>,
}

/// A performance fact with its date and product rows attached.
#[derive(Debug, Clone, Copy)]
pub struct PerformanceLine<'a> {
    pub fact: &'a PerformanceFact,
    pub date: Option<&'a DateRow>,
    pub product: Option<&'a DimProduct>,
}

/// Left-joined view over a loaded schema. Every fact row appears exactly once.
#[derive(Debug, Clone, Default)]
pub struct Denormalized<'a> {
    pub sales: Vec<SalesLine<'a>>,
    pub performance: Vec<PerformanceLine<'a>>,
}

fn index_by_key<R: DimensionRow>(rows: &[R]) -> HashMap<SurrogateKey, &R> {
    rows.iter().map(|r| (r.surrogate_key(), r)).collect()
}

fn attach<'a, K, R>(index: &HashMap<K, &'a R>, key: KeyLookup<K>) -> Option<&'a R>
where
    K: Copy + Eq + std::hash::Hash,
{
    key.key().and_then(|k| index.get(&k).copied())
}

pub fn denormalize(schema: &StarSchema) -> Denormalized<'_> {
    let dates: HashMap<DateKey, &DateRow> =
        schema.date.rows.iter().map(|r| (r.date_key, r)).collect();
    let products = index_by_key(&schema.product.rows);
    let customers = index_by_key(&schema.customer.rows);
    let stores = index_by_key(&schema.store.rows);

    let sales = schema
        .sales
        .iter()
        .map(|fact| SalesLine {
            fact,
            date: attach(&dates, fact.date_key),
            product: attach(&products, fact.product_key),
            customer: attach(&customers, fact.customer_key),
            store: attach(&stores, fact.store_key),
        })
        .collect();
    let performance = schema
        .performance
        .iter()
        .map(|fact| PerformanceLine {
            fact,
            date: attach(&dates, fact.date_key),
            product: attach(&products, fact.product_key),
        })
        .collect();
    Denormalized { sales, performance }
}

/// Restricts report rows by product category, store country and calendar year.
///
/// An empty list places no restriction. Text matches ignore ASCII case. When a
/// list is non-empty, rows missing that attribute are excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub categories: Vec<String>,
    pub countries: Vec<String>,
    pub years: Vec<i32>,
}

fn allows_text(list: &[String], value: Option<&str>) -> bool {
    list.is_empty() || value.is_some_and(|v| list.iter().any(|want| want.eq_ignore_ascii_case(v)))
}

fn allows_year(list: &[i32], value: Option<i32>) -> bool {
    list.is_empty() || value.is_some_and(|y| list.contains(&y))
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.countries.is_empty() && self.years.is_empty()
    }

    pub fn allows_sale(&self, line: &SalesLine<'_>) -> bool {
        allows_text(
            &self.categories,
            line.product.and_then(|p| p.category.as_deref()),
        ) && allows_text(
            &self.countries,
            line.store.and_then(|s| s.country.as_deref()),
        ) && allows_year(&self.years, line.date.map(|d| d.year))
    }

    /// Performance rows have no store, so only category and year apply.
    pub fn allows_performance(&self, line: &PerformanceLine<'_>) -> bool {
        allows_text(
            &self.categories,
            line.product.and_then(|p| p.category.as_deref()),
        ) && allows_year(&self.years, line.date.map(|d| d.year))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::clean::CleanTables;
    use crate::models::cleaned::{CleanProduct, CleanSale, CleanStore};
    use crate::star::build_star_schema;

    fn schema() -> StarSchema {
        let day = NaiveDate::from_ymd_opt(2022, 3, 4);
        let clean = CleanTables {
            products: vec![CleanProduct {
                product_id: "P1".into(),
                category: Some("LIGHTING".into()),
                ..Default::default()
            }],
            stores: vec![CleanStore {
                store_id: "S1".into(),
                country: Some("UK".into()),
                ..Default::default()
            }],
            sales: vec![
                CleanSale {
                    transaction_id: "T1".into(),
                    product_id: Some("P1".into()),
                    store_id: Some("S1".into()),
                    transaction_date: day,
                    ..Default::default()
                },
                CleanSale {
                    transaction_id: "T2".into(),
                    product_id: Some("P404".into()),
                    store_id: Some("S1".into()),
                    transaction_date: day,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let (schema, _) = build_star_schema(
            &clean,
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
        );
        schema
    }

    #[test]
    fn left_join_keeps_unmatched_facts() {
        let schema = schema();
        let view = denormalize(&schema);
        assert_eq!(view.sales.len(), 2);
        assert_eq!(view.sales[0].product.map(|p| p.product_id.as_str()), Some("P1"));
        assert_eq!(view.sales[0].date.map(|d| d.month), Some(3));
        assert!(view.sales[1].product.is_none());
        assert!(view.sales[1].customer.is_none());
        assert!(view.sales[1].store.is_some());
    }

    #[test]
    fn filters_match_case_insensitively_and_drop_missing() {
        let schema = schema();
        let view = denormalize(&schema);
        let f = Filter {
            categories: vec!["lighting".into()],
            ..Default::default()
        };
        assert!(f.allows_sale(&view.sales[0]));
        assert!(!f.allows_sale(&view.sales[1]));

        let f = Filter {
            countries: vec!["uk".into()],
            years: vec![2022],
            ..Default::default()
        };
        assert!(view.sales.iter().all(|l| f.allows_sale(l)));

        let f = Filter {
            years: vec![2023],
            ..Default::default()
        };
        assert!(!f.allows_sale(&view.sales[0]));
        assert!(Filter::default().is_empty());
    }
}

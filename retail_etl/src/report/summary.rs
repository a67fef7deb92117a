use std::collections::BTreeMap;

use serde::Serialize;

use crate::report::join::{Denormalized, Filter, PerformanceLine, SalesLine};

/// Running mean that ignores missing values.
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    n: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.n += 1;
        }
    }

    fn get(self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub year: i32,
    pub month: u32,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub total_amount: f64,
}

/// Mean performance measures for one product category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPerformance {
    pub category: String,
    pub energy_consumption_kwh: Option<f64>,
    pub failure_rate: Option<f64>,
    pub customer_satisfaction: Option<f64>,
    pub return_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryFailure {
    pub category: String,
    pub subcategory: String,
    pub failure_rate: Option<f64>,
}

/// Headline figures and breakdowns over the filtered rows.
///
/// Breakdowns are sorted by their group key. Rows missing a group attribute
/// count toward the headline figures but not toward that breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub filter: Filter,
    pub sales_lines: usize,
    pub performance_rows: usize,
    pub total_sales: f64,
    pub avg_customer_satisfaction: Option<f64>,
    pub avg_profit_margin: Option<f64>,
    pub sales_by_month: Vec<MonthTotal>,
    pub sales_by_category: Vec<GroupTotal>,
    pub sales_by_country: Vec<GroupTotal>,
    pub performance_by_category: Vec<CategoryPerformance>,
    pub failure_by_subcategory: Vec<SubcategoryFailure>,
}

#[derive(Default)]
struct PerfAcc {
    energy: Mean,
    failure: Mean,
    satisfaction: Mean,
    returns: Mean,
}

fn add_to(groups: &mut BTreeMap<String, f64>, key: Option<&str>, amount: f64) {
    if let Some(k) = key {
        *groups.entry(k.to_owned()).or_default() += amount;
    }
}

fn totals(groups: BTreeMap<String, f64>) -> Vec<GroupTotal> {
    groups
        .into_iter()
        .map(|(key, total_amount)| GroupTotal { key, total_amount })
        .collect()
}

/// Summarize the rows of `view` that pass `filter`.
pub fn summarize(view: &Denormalized<'_>, filter: &Filter) -> Summary {
    let sales: Vec<&SalesLine<'_>> = view.sales.iter().filter(|l| filter.allows_sale(l)).collect();
    let performance: Vec<&PerformanceLine<'_>> = view
        .performance
        .iter()
        .filter(|l| filter.allows_performance(l))
        .collect();

    let mut total_sales = 0.0;
    let mut margin = Mean::default();
    let mut by_month: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    let mut by_category = BTreeMap::new();
    let mut by_country = BTreeMap::new();
    for line in &sales {
        let amount = line.fact.total_amount.unwrap_or(0.0);
        total_sales += amount;
        margin.push(line.product.and_then(|p| p.profit_margin));
        if let Some(d) = line.date {
            *by_month.entry((d.year, d.month)).or_default() += amount;
        }
        add_to(
            &mut by_category,
            line.product.and_then(|p| p.category.as_deref()),
            amount,
        );
        add_to(
            &mut by_country,
            line.store.and_then(|s| s.country.as_deref()),
            amount,
        );
    }

    let mut satisfaction = Mean::default();
    let mut perf_by_category: BTreeMap<String, PerfAcc> = BTreeMap::new();
    let mut failure_by_sub: BTreeMap<(String, String), Mean> = BTreeMap::new();
    for line in &performance {
        let f = line.fact;
        satisfaction.push(f.customer_satisfaction);
        let Some(category) = line.product.and_then(|p| p.category.as_deref()) else {
            continue;
        };
        let acc = perf_by_category.entry(category.to_owned()).or_default();
        acc.energy.push(f.energy_consumption_kwh);
        acc.failure.push(f.failure_rate);
        acc.satisfaction.push(f.customer_satisfaction);
        acc.returns.push(f.return_rate);
        if let Some(sub) = line.product.and_then(|p| p.subcategory.as_deref()) {
            failure_by_sub
                .entry((category.to_owned(), sub.to_owned()))
                .or_default()
                .push(f.failure_rate);
        }
    }

    Summary {
        filter: filter.clone(),
        sales_lines: sales.len(),
        performance_rows: performance.len(),
        total_sales,
        avg_customer_satisfaction: satisfaction.get(),
        avg_profit_margin: margin.get(),
        sales_by_month: by_month
            .into_iter()
            .map(|((year, month), total_amount)| MonthTotal {
                year,
                month,
                total_amount,
            })
            .collect(),
        sales_by_category: totals(by_category),
        sales_by_country: totals(by_country),
        performance_by_category: perf_by_category
            .into_iter()
            .map(|(category, acc)| CategoryPerformance {
                category,
                energy_consumption_kwh: acc.energy.get(),
                failure_rate: acc.failure.get(),
                customer_satisfaction: acc.satisfaction.get(),
                return_rate: acc.returns.get(),
            })
            .collect(),
        failure_by_subcategory: failure_by_sub
            .into_iter()
            .map(|((category, subcategory), m)| SubcategoryFailure {
                category,
                subcategory,
                failure_rate: m.get(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::clean::CleanTables;
    use crate::models::cleaned::{CleanPerformance, CleanProduct, CleanSale, CleanStore};
    use crate::report::join::denormalize;
    use crate::star::build_star_schema;

    fn product(id: &str, category: &str, sub: &str, margin: f64) -> CleanProduct {
        CleanProduct {
            product_id: id.into(),
            category: Some(category.into()),
            subcategory: Some(sub.into()),
            profit_margin: Some(margin),
            ..Default::default()
        }
    }

    fn sale(id: &str, product: &str, store: &str, date: (i32, u32, u32), total: f64) -> CleanSale {
        CleanSale {
            transaction_id: id.into(),
            product_id: Some(product.into()),
            store_id: Some(store.into()),
            transaction_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2),
            total_amount: Some(total),
            ..Default::default()
        }
    }

    fn perf(product: &str, year: i32, month: u32, failure: f64, satisfaction: f64) -> CleanPerformance {
        CleanPerformance {
            product_id: Some(product.into()),
            year: Some(year),
            month: Some(month),
            failure_rate: Some(failure),
            customer_satisfaction: Some(satisfaction),
            energy_consumption_kwh: Some(10.0),
            return_rate: Some(0.01),
            ..Default::default()
        }
    }

    fn clean() -> CleanTables {
        CleanTables {
            products: vec![
                product("P1", "LIGHTING", "LED Bulbs", 40.0),
                product("P2", "APPLIANCES", "Refrigerators", 20.0),
            ],
            stores: vec![
                CleanStore {
                    store_id: "S1".into(),
                    country: Some("UK".into()),
                    ..Default::default()
                },
                CleanStore {
                    store_id: "S2".into(),
                    country: Some("GERMANY".into()),
                    ..Default::default()
                },
            ],
            sales: vec![
                sale("T1", "P1", "S1", (2022, 1, 5), 100.0),
                sale("T2", "P2", "S2", (2022, 1, 9), 50.0),
                sale("T3", "P1", "S2", (2023, 2, 1), 25.0),
                sale("T4", "P9", "S1", (2023, 2, 2), 5.0),
            ],
            performance: vec![
                perf("P1", 2022, 1, 0.02, 4.0),
                perf("P1", 2023, 1, 0.04, 5.0),
                perf("P2", 2022, 1, 0.10, 3.0),
            ],
            ..Default::default()
        }
    }

    fn summary(filter: &Filter) -> Summary {
        let (schema, _) = build_star_schema(
            &clean(),
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        );
        summarize(&denormalize(&schema), filter)
    }

    #[test]
    fn unfiltered_totals_and_groupings() {
        let s = summary(&Filter::default());
        assert_eq!(s.sales_lines, 4);
        assert_eq!(s.total_sales, 180.0);
        assert_eq!(s.avg_profit_margin, Some(100.0 / 3.0));
        assert_eq!(s.avg_customer_satisfaction, Some(4.0));
        assert_eq!(
            s.sales_by_month,
            vec![
                MonthTotal {
                    year: 2022,
                    month: 1,
                    total_amount: 150.0
                },
                MonthTotal {
                    year: 2023,
                    month: 2,
                    total_amount: 30.0
                },
            ]
        );
        let cats: Vec<_> = s
            .sales_by_category
            .iter()
            .map(|g| (g.key.as_str(), g.total_amount))
            .collect();
        assert_eq!(cats, [("APPLIANCES", 50.0), ("LIGHTING", 125.0)]);
        let countries: Vec<_> = s
            .sales_by_country
            .iter()
            .map(|g| (g.key.as_str(), g.total_amount))
            .collect();
        assert_eq!(countries, [("GERMANY", 75.0), ("UK", 105.0)]);

        assert_eq!(s.performance_by_category.len(), 2);
        let lighting = &s.performance_by_category[1];
        assert_eq!(lighting.category, "LIGHTING");
        assert_eq!(lighting.customer_satisfaction, Some(4.5));
        assert_eq!(s.failure_by_subcategory[0].subcategory, "Refrigerators");
        assert_eq!(s.failure_by_subcategory[0].failure_rate, Some(0.10));
    }

    #[test]
    fn filters_narrow_every_section() {
        let s = summary(&Filter {
            categories: vec!["Lighting".into()],
            years: vec![2022],
            ..Default::default()
        });
        assert_eq!(s.sales_lines, 1);
        assert_eq!(s.total_sales, 100.0);
        assert_eq!(s.performance_rows, 1);
        assert_eq!(s.avg_customer_satisfaction, Some(4.0));

        let s = summary(&Filter {
            countries: vec!["germany".into()],
            ..Default::default()
        });
        assert_eq!(s.total_sales, 75.0);
        // store country does not apply to performance rows
        assert_eq!(s.performance_rows, 3);
    }

    #[test]
    fn empty_selection_has_no_averages() {
        let s = summary(&Filter {
            years: vec![1999],
            ..Default::default()
        });
        assert_eq!(s.sales_lines, 0);
        assert_eq!(s.total_sales, 0.0);
        assert_eq!(s.avg_profit_margin, None);
        assert_eq!(s.avg_customer_satisfaction, None);
        assert!(s.sales_by_month.is_empty());
    }
}

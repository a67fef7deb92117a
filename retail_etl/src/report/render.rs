use std::fmt;

use crate::report::summary::Summary;

/// Pretty-printed JSON of a summary.
pub fn to_json(summary: &Summary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

fn opt(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn list(values: &[impl fmt::Display]) -> String {
    if values.is_empty() {
        "all".to_string()
    } else {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{title}")?;
    writeln!(f, "{}", "-".repeat(title.len()))
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Filter")?;
        writeln!(f, "------")?;
        writeln!(f, "categories: {}", list(&self.filter.categories))?;
        writeln!(f, "countries:  {}", list(&self.filter.countries))?;
        writeln!(f, "years:      {}", list(&self.filter.years))?;

        heading(f, "Key metrics")?;
        writeln!(f, "{:<28} {:>14}", "sales lines", self.sales_lines)?;
        writeln!(f, "{:<28} {:>14.2}", "total sales", self.total_sales)?;
        writeln!(
            f,
            "{:<28} {:>14}",
            "avg customer satisfaction",
            opt(self.avg_customer_satisfaction)
        )?;
        writeln!(
            f,
            "{:<28} {:>14}",
            "avg profit margin %",
            opt(self.avg_profit_margin)
        )?;

        if !self.sales_by_month.is_empty() {
            heading(f, "Sales by month")?;
            for m in &self.sales_by_month {
                writeln!(f, "{:04}-{:02}  {:>14.2}", m.year, m.month, m.total_amount)?;
            }
        }
        if !self.sales_by_category.is_empty() {
            heading(f, "Sales by category")?;
            for g in &self.sales_by_category {
                writeln!(f, "{:<28} {:>14.2}", g.key, g.total_amount)?;
            }
        }
        if !self.sales_by_country.is_empty() {
            heading(f, "Sales by store country")?;
            for g in &self.sales_by_country {
                writeln!(f, "{:<28} {:>14.2}", g.key, g.total_amount)?;
            }
        }
        if !self.performance_by_category.is_empty() {
            heading(f, "Performance by category")?;
            writeln!(
                f,
                "{:<20} {:>10} {:>10} {:>12} {:>10}",
                "category", "kwh", "failure", "satisfaction", "returns"
            )?;
            for p in &self.performance_by_category {
                writeln!(
                    f,
                    "{:<20} {:>10} {:>10} {:>12} {:>10}",
                    p.category,
                    opt(p.energy_consumption_kwh),
                    opt(p.failure_rate),
                    opt(p.customer_satisfaction),
                    opt(p.return_rate)
                )?;
            }
        }
        if !self.failure_by_subcategory.is_empty() {
            heading(f, "Failure rate by subcategory")?;
            for s in &self.failure_by_subcategory {
                let label = format!("{} / {}", s.category, s.subcategory);
                writeln!(f, "{label:<40} {:>10}", opt(s.failure_rate))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::join::Filter;
    use crate::report::summary::GroupTotal;

    fn summary() -> Summary {
        Summary {
            filter: Filter {
                years: vec![2022],
                ..Default::default()
            },
            sales_lines: 2,
            performance_rows: 0,
            total_sales: 1234.5,
            avg_customer_satisfaction: None,
            avg_profit_margin: Some(33.333),
            sales_by_month: vec![],
            sales_by_category: vec![GroupTotal {
                key: "LIGHTING".into(),
                total_amount: 1234.5,
            }],
            sales_by_country: vec![],
            performance_by_category: vec![],
            failure_by_subcategory: vec![],
        }
    }

    #[test]
    fn text_sections_skip_empty_breakdowns() {
        let text = summary().to_string();
        assert!(text.starts_with("Filter\n------\n"));
        assert!(text.contains("years:      2022\n"));
        assert!(text.contains("categories: all\n"));
        assert!(text.contains("1234.50"));
        assert!(text.contains("33.33"));
        assert!(text.contains("Sales by category\n-----------------\n"));
        assert!(!text.contains("Sales by month"));
    }

    #[test]
    fn json_has_null_for_missing_averages() {
        let json = to_json(&summary()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["avg_customer_satisfaction"], serde_json::Value::Null);
        assert_eq!(v["sales_by_category"][0]["key"], "LIGHTING");
        assert_eq!(v["filter"]["years"][0], 2022);
    }
}

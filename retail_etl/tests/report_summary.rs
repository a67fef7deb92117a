mod common;

use std::process::Command;

use common::setup_workspace;
use retail_etl::pipeline;
use retail_etl::report::{Filter, Summary};

fn approx(a: Option<f64>, b: f64) -> bool {
    a.is_some_and(|a| (a - b).abs() < 1e-9)
}

fn report(filter: Filter) -> Summary {
    let ws = setup_workspace();
    pipeline::run(&ws.cfg).unwrap();
    pipeline::report_stage(&ws.cfg, &filter).unwrap()
}

#[test]
fn unfiltered_summary() {
    let s = report(Filter::default());
    assert_eq!(s.sales_lines, 5);
    assert_eq!(s.performance_rows, 4);
    assert!(approx(Some(s.total_sales), 1680.0));
    assert!(approx(s.avg_profit_margin, 45.625));
    assert!(approx(s.avg_customer_satisfaction, 12.4 / 3.0));

    let months: Vec<_> = s
        .sales_by_month
        .iter()
        .map(|m| (m.year, m.month, m.total_amount))
        .collect();
    assert_eq!(months, [(2022, 1, 440.0), (2023, 6, 1200.0), (2023, 7, 20.0)]);

    let categories: Vec<_> = s
        .sales_by_category
        .iter()
        .map(|g| (g.key.as_str(), g.total_amount))
        .collect();
    assert_eq!(
        categories,
        [("APPLIANCES", 1200.0), ("LIGHTING", 100.0), ("RENEWABLE ENERGY", 360.0)]
    );

    let countries: Vec<_> = s
        .sales_by_country
        .iter()
        .map(|g| (g.key.as_str(), g.total_amount))
        .collect();
    assert_eq!(countries, [("GERMANY", 1240.0), ("UK", 440.0)]);

    let subs: Vec<_> = s
        .failure_by_subcategory
        .iter()
        .map(|f| f.subcategory.as_str())
        .collect();
    assert_eq!(subs, ["Refrigerators", "LED Bulbs", "Solar Panels"]);
}

#[test]
fn year_and_category_filters() {
    let s = report(Filter {
        years: vec![2022],
        ..Default::default()
    });
    assert_eq!(s.sales_lines, 2);
    assert!(approx(Some(s.total_sales), 440.0));
    // the malformed-month performance row has no date and drops out
    assert_eq!(s.performance_rows, 2);

    let s = report(Filter {
        categories: vec!["appliances".into()],
        ..Default::default()
    });
    assert_eq!(s.sales_lines, 1);
    assert_eq!(s.performance_rows, 1);
    assert!(approx(s.avg_customer_satisfaction, 3.0));
}

#[test]
fn country_filter_uses_store_country() {
    let s = report(Filter {
        countries: vec!["UK".into()],
        ..Default::default()
    });
    assert!(approx(Some(s.total_sales), 440.0));
    assert_eq!(s.sales_by_country.len(), 1);
}

#[test]
fn cli_run_then_json_report() {
    let ws = setup_workspace();
    let config = ws.root().join("etl.toml");
    let toml = format!(
        "[paths]\nraw_dir = {:?}\nprocessed_dir = {:?}\nschema_dir = {:?}\n",
        ws.cfg.paths.raw_dir, ws.cfg.paths.processed_dir, ws.cfg.paths.schema_dir
    );
    std::fs::write(&config, toml).unwrap();

    let bin = env!("CARGO_BIN_EXE_retail-etl");
    let status = Command::new(bin)
        .args(["-q", "--config"])
        .arg(&config)
        .arg("run")
        .status()
        .unwrap();
    assert!(status.success());

    let out = Command::new(bin)
        .args(["-q", "--config"])
        .arg(&config)
        .args(["report", "--format", "json", "--country", "germany"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["sales_lines"], 3);
    assert_eq!(v["filter"]["countries"][0], "germany");
}

#[test]
fn cli_report_without_schema_fails() {
    let ws = setup_workspace();
    let config = ws.root().join("etl.toml");
    std::fs::write(
        &config,
        format!("[paths]\nschema_dir = {:?}\n", ws.cfg.paths.schema_dir),
    )
    .unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_retail-etl"))
        .arg("--config")
        .arg(&config)
        .arg("report")
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing artifact"));
}

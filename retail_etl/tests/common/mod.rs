#![allow(dead_code)]

use std::{fs, path::Path};

use retail_etl::config::{EtlConfig, PathsCfg};
use tempfile::TempDir;

pub const PRODUCTS: &str = "\
product_id,product_name,category,subcategory,energy_rating,price,manufacturing_cost,warranty_years,weight_kg,stock_quantity,launch_date
P0001, LED Bulbs Eco 1 ,Lighting,LED Bulbs,A++,20.0,8.0,2,0.1,500,2021-04-01
P0002,Refrigerators Pro 2,Appliances,Refrigerators,A+,1200.0,900.0,,85.5,12,2020-09-15
P0003,Solar Panels Max 3,Renewable Energy,Solar Panels,A,400.0,250.0,5,,40,
";

pub const CUSTOMERS: &str = "\
customer_id,customer_name,country,segment,acquisition_date,lifetime_value
C0001,Customer 1,UK,Residential,2021-05-05,1500.0
C0002,Customer 2,Germany,Commercial,2022-02-11,
";

pub const STORES: &str = "\
store_id,store_name,country,store_type,opening_date,size_sqm
S001,UK Flagship Store 1,UK,Flagship,2019-01-01,2500
S002,Germany Online Store 2,germany,Online,2020-06-01,
";

/// Five line items: one unknown product, one date outside the default range.
pub const SALES: &str = "\
transaction_id,product_id,customer_id,store_id,transaction_date,quantity,unit_price,discount,final_price,total_amount,payment_method
T000001,P0001,C0001,S001,2022-01-15,4,20.0,0.0,20.0,80.0,Credit Card
T000001,P0003,C0001,S001,2022-01-15,1,400.0,0.1,360.0,360.0,Credit Card
T000002,P0002,C0002,S002,2023-06-30 14:05:00,,1200.0,,1200.0,,Bank Transfer
T000003,P9999,C0002,S002,2023-07-01,2,10.0,0.0,10.0,20.0,Cash
T000004,P0001,C0001,S002,2025-01-01,1,20.0,0.0,20.0,20.0,Cash
";

pub const PERFORMANCE: &str = "\
product_id,year_month,energy_consumption_kwh,failure_rate,customer_satisfaction,return_rate,warranty_claims
P0001,2022-03,1.2,0.01,4.5,0.02,0
P0002,2022-03,35.0,0.03,,0.01,2
P0003,2023-12,0.0,0.002,4.9,0.0,0
P0001,2022-13,1.1,0.01,9.0,0.02,0
";

/// A scratch directory holding the raw input CSVs and a config rooted at it.
pub struct Workspace {
    dir: TempDir, // keep alive for the life of the test
    pub cfg: EtlConfig,
}

impl Workspace {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

pub fn write_raw(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("products.csv"), PRODUCTS).unwrap();
    fs::write(dir.join("customers.csv"), CUSTOMERS).unwrap();
    fs::write(dir.join("stores.csv"), STORES).unwrap();
    fs::write(dir.join("sales.csv"), SALES).unwrap();
    fs::write(dir.join("product_performance.csv"), PERFORMANCE).unwrap();
}

/// Default config rooted in a fresh temp dir, with the raw fixture written.
pub fn setup_workspace() -> Workspace {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();
    let cfg = EtlConfig {
        paths: PathsCfg {
            raw_dir: root.join("data/sample_data"),
            processed_dir: root.join("data/processed_data"),
            schema_dir: root.join("data/star_schema"),
        },
        ..Default::default()
    };
    write_raw(&cfg.paths.raw_dir);
    Workspace { dir, cfg }
}

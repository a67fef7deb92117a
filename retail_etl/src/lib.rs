//! Retail star-schema ETL: clean raw product, customer, store, sales and
//! performance tables, reshape them into a star schema with surrogate keys,
//! persist the schema atomically, and query it for reporting.

pub mod calendar;
pub mod clean;
pub mod config;
pub mod keys;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod star;
pub mod store;

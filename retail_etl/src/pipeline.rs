//! Stage orchestration: clean, build, run, and report.
//!
//! Each stage reads whole files at its start and writes whole files at its
//! end. A failed stage returns an error and later stages do not run.

use std::{fs, path::Path};

use anyhow::Context;
use tracing::info;

use crate::clean::{CleanReport, CleanTables, RawTables, clean_all};
use crate::config::EtlConfig;
use crate::models::Table;
use crate::models::cleaned::{CleanCustomer, CleanPerformance, CleanProduct, CleanSale, CleanStore};
use crate::models::raw::{RawCustomer, RawPerformance, RawProduct, RawSale, RawStore};
use crate::report::{Filter, Summary, denormalize, summarize};
use crate::star::{BuildReport, build_star_schema};
use crate::store::{SchemaManifest, load_schema, persist_schema, read_rows, read_table, write_table};

fn read_raw_table<T: Table>(dir: &Path) -> anyhow::Result<Vec<T>> {
    let path = dir.join(T::file_name());
    read_rows(&path).with_context(|| format!("read raw table {}", path.display()))
}

/// Read the five raw input CSVs from `dir`.
pub fn read_raw(dir: &Path) -> anyhow::Result<RawTables> {
    Ok(RawTables {
        products: read_raw_table::<RawProduct>(dir)?,
        customers: read_raw_table::<RawCustomer>(dir)?,
        stores: read_raw_table::<RawStore>(dir)?,
        sales: read_raw_table::<RawSale>(dir)?,
        performance: read_raw_table::<RawPerformance>(dir)?,
    })
}

fn write_clean_table<T: Table>(dir: &Path, rows: &[T]) -> anyhow::Result<()> {
    let path = dir.join(T::file_name());
    write_table(&path, rows).with_context(|| format!("write {}", path.display()))
}

/// Write the five `*_processed.csv` tables into `dir`, creating it if needed.
pub fn write_clean(dir: &Path, tables: &CleanTables) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    write_clean_table(dir, &tables.products)?;
    write_clean_table(dir, &tables.customers)?;
    write_clean_table(dir, &tables.stores)?;
    write_clean_table(dir, &tables.sales)?;
    write_clean_table(dir, &tables.performance)?;
    Ok(())
}

fn read_clean_table<T: Table>(dir: &Path) -> anyhow::Result<Vec<T>> {
    let path = dir.join(T::file_name());
    read_table(&path).with_context(|| format!("read processed table {}", path.display()))
}

/// Read the five `*_processed.csv` tables from `dir`.
pub fn read_clean(dir: &Path) -> anyhow::Result<CleanTables> {
    Ok(CleanTables {
        products: read_clean_table::<CleanProduct>(dir)?,
        customers: read_clean_table::<CleanCustomer>(dir)?,
        stores: read_clean_table::<CleanStore>(dir)?,
        sales: read_clean_table::<CleanSale>(dir)?,
        performance: read_clean_table::<CleanPerformance>(dir)?,
    })
}

/// Raw CSVs -> processed CSVs.
pub fn clean_stage(cfg: &EtlConfig) -> anyhow::Result<CleanReport> {
    info!(raw_dir = %cfg.paths.raw_dir.display(), "clean stage");
    let raw = read_raw(&cfg.paths.raw_dir).context("clean stage: read raw inputs")?;
    let (tables, report) = clean_all(raw);
    write_clean(&cfg.paths.processed_dir, &tables).context("clean stage: write processed tables")?;
    info!(
        processed_dir = %cfg.paths.processed_dir.display(),
        coerced = report.total_coerced(),
        "clean stage done"
    );
    Ok(report)
}

/// What a build stage produced.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub report: BuildReport,
    pub manifest: SchemaManifest,
}

/// Processed CSVs -> committed star schema.
pub fn build_stage(cfg: &EtlConfig) -> anyhow::Result<BuildOutcome> {
    info!(processed_dir = %cfg.paths.processed_dir.display(), "build stage");
    let clean = read_clean(&cfg.paths.processed_dir).context("build stage: read processed tables")?;
    let range = cfg.date_dimension;
    let (schema, report) = build_star_schema(&clean, range.start, range.end);
    let manifest = persist_schema(&schema, &cfg.paths.schema_dir)
        .with_context(|| format!("build stage: persist schema to {}", cfg.paths.schema_dir.display()))?;
    info!(
        schema_dir = %cfg.paths.schema_dir.display(),
        unmatched = report.total_unmatched(),
        "build stage done"
    );
    Ok(BuildOutcome { report, manifest })
}

/// Everything one full run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub clean: CleanReport,
    pub build: BuildOutcome,
}

/// Clean then build.
pub fn run(cfg: &EtlConfig) -> anyhow::Result<RunOutcome> {
    let clean = clean_stage(cfg)?;
    let build = build_stage(cfg)?;
    Ok(RunOutcome { clean, build })
}

/// Load the committed schema and summarize it under `filter`.
pub fn report_stage(cfg: &EtlConfig, filter: &Filter) -> anyhow::Result<Summary> {
    let (schema, manifest) = load_schema(&cfg.paths.schema_dir)
        .with_context(|| format!("load schema from {}", cfg.paths.schema_dir.display()))?;
    info!(built_at = %manifest.built_at, "loaded schema");
    Ok(summarize(&denormalize(&schema), filter))
}

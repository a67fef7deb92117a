//! Pipeline configuration: parsing, validation, and loading.
//!
//! A TOML file with two optional tables; every field falls back to a default:
//!
//! ```toml
//! [paths]
//! raw_dir = "data/sample_data"
//! processed_dir = "data/processed_data"
//! schema_dir = "data/star_schema"
//!
//! [date_dimension]
//! start = "2022-01-01"
//! end = "2023-12-31"
//! ```
//!
//! Entrypoints:
//! - Parse + validate from a TOML string: [`load_config_str`]
//! - Parse + validate from a file path: [`load_config_path`]
//! - Pick the file from `--config`, then `RETAIL_ETL_CONFIG`, else defaults: [`resolve_config`]
//!
//! Relative paths are used as given, i.e. relative to the working directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use shared_utils::env::get_env_path;
use toml::from_str;
use tracing::debug;

use crate::keys::DATE_KEY_YEARS;

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "RETAIL_ETL_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct EtlConfig {
    pub paths: PathsCfg,
    pub date_dimension: DateRangeCfg,
}

/// Where each stage reads and writes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct PathsCfg {
    /// Directory holding `products.csv`, `customers.csv`, `stores.csv`,
    /// `sales.csv` and `product_performance.csv`.
    pub raw_dir: PathBuf,
    /// Directory for the `*_processed.csv` tables.
    pub processed_dir: PathBuf,
    /// Directory the star schema is committed to.
    pub schema_dir: PathBuf,
}

impl Default for PathsCfg {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/sample_data"),
            processed_dir: PathBuf::from("data/processed_data"),
            schema_dir: PathBuf::from("data/star_schema"),
        }
    }
}

/// Inclusive day range of the date dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct DateRangeCfg {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for DateRangeCfg {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default(),
        }
    }
}

impl EtlConfig {
    /// Check the invariants the stages rely on.
    ///
    /// Errors:
    /// - An empty path
    /// - `end` before `start`
    /// - A year outside [`DATE_KEY_YEARS`]
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, path) in [
            ("paths.raw_dir", &self.paths.raw_dir),
            ("paths.processed_dir", &self.paths.processed_dir),
            ("paths.schema_dir", &self.paths.schema_dir),
        ] {
            if path.as_os_str().is_empty() {
                bail!("{name} cannot be empty");
            }
        }
        let DateRangeCfg { start, end } = self.date_dimension;
        if end < start {
            bail!("date_dimension.end ({end}) is before date_dimension.start ({start})");
        }
        for d in [start, end] {
            if !DATE_KEY_YEARS.contains(&d.year()) {
                bail!(
                    "date_dimension year {} is outside {}..={}",
                    d.year(),
                    DATE_KEY_YEARS.start(),
                    DATE_KEY_YEARS.end()
                );
            }
        }
        Ok(())
    }
}

/// Parse and validate a config from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<EtlConfig> {
    let cfg: EtlConfig = from_str(toml_str).context("failed to parse config TOML")?;
    cfg.validate().context("invalid config")?;
    Ok(cfg)
}

/// Read a config TOML file from disk, parse, and validate it.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<EtlConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text).with_context(|| format!("load config {}", path.as_ref().display()))
}

/// Load the config named by `explicit`, else by [`CONFIG_ENV_VAR`], else the defaults.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<EtlConfig> {
    let from_env = match explicit {
        Some(_) => None,
        None => get_env_path(CONFIG_ENV_VAR).context("read config path from environment")?,
    };
    match explicit.map(Path::to_path_buf).or(from_env) {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config_path(&path)
        }
        None => {
            debug!("no config file; using defaults");
            let cfg = EtlConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }
}

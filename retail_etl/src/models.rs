//! Row types for every table the pipeline reads or writes.
//!
//! - [`raw`]: operator-supplied input CSVs; every field is an optional string.
//! - [`cleaned`]: typed output of the cleaner (`*_processed.csv`).
//! - [`star`]: dimension and fact rows of the star schema (`dim_*`, `fact_*`).
//!
//! Every row type implements [`Table`], which pins the artifact name and the
//! exact column list. The column list must match the struct field order; the
//! CSV writer emits it as the header even for empty tables.

use serde::{Serialize, de::DeserializeOwned};

pub mod cleaned;
pub mod raw;
pub mod star;

/// A named, column-ordered tabular artifact.
pub trait Table: Serialize + DeserializeOwned {
    /// Logical table name, also the artifact file stem (e.g. `"dim_product"`).
    const NAME: &'static str;
    /// Exact header, in serialization order.
    const COLUMNS: &'static [&'static str];

    /// Artifact file name (`<NAME>.csv`).
    fn file_name() -> String {
        format!("{}.csv", Self::NAME)
    }
}

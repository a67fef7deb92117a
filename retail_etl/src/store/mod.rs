//! Schema store: CSV table IO, the schema manifest, and the staged
//! all-or-nothing commit of a built star schema.
//!
//! Layout of a persisted schema directory:
//!
//! ```text
//! <schema_dir>/
//!   dim_date.csv  dim_product.csv  dim_customer.csv  dim_store.csv
//!   fact_sales.csv  fact_performance.csv
//!   manifest.json
//! ```

pub mod csv_io;
pub mod manifest;
pub mod schema;

use std::path::PathBuf;

pub use csv_io::{read_rows, read_table, write_table};
pub use manifest::{ArtifactEntry, DateSpan, MANIFEST_FILE, SchemaManifest};
pub use schema::{load_schema, persist_schema};

#[derive(thiserror::Error, Debug)]
/// Errors raised while reading or writing tables and schemas.
pub enum StoreError {
    /// A required input or schema artifact does not exist.
    #[error("missing artifact: {}", path.display())]
    MissingArtifact { path: PathBuf },

    /// A CSV file could not be read, parsed, or written.
    #[error("csv error in {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A table's header does not match the expected columns.
    #[error("unexpected columns in {}: expected {expected:?}, found {found:?}", path.display())]
    ColumnMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A persisted artifact disagrees with the manifest.
    #[error("{artifact} does not match manifest: {detail}")]
    ManifestMismatch { artifact: String, detail: String },

    /// The destination has no parent directory to stage next to.
    #[error("invalid schema destination: {}", path.display())]
    InvalidDestination { path: PathBuf },

    /// The manifest could not be encoded or decoded.
    #[error("manifest json error in {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A filesystem operation failed.
    #[error("I/O error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

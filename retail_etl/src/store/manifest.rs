use std::{fs, io::ErrorKind, path::Path};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Table;
use crate::store::{StoreError, StoreResult};

/// File name of the manifest inside a schema directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Describes one committed schema: when it was built and what it contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaManifest {
    pub built_at: DateTime<Utc>,
    /// `None` when the date dimension is empty.
    pub date_range: Option<DateSpan>,
    pub artifacts: Vec<ArtifactEntry>,
}

/// Inclusive day range of the date dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub name: String,
    pub file: String,
    pub rows: usize,
    pub columns: Vec<String>,
}

impl ArtifactEntry {
    pub fn for_table<T: Table>(rows: usize) -> Self {
        Self {
            name: T::NAME.to_string(),
            file: T::file_name(),
            rows,
            columns: T::COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl SchemaManifest {
    /// Entry for table `T`, or `ManifestMismatch` when the manifest does not list it.
    pub fn entry<T: Table>(&self) -> StoreResult<&ArtifactEntry> {
        self.artifacts
            .iter()
            .find(|a| a.name == T::NAME)
            .ok_or_else(|| StoreError::ManifestMismatch {
                artifact: T::NAME.to_string(),
                detail: "not listed".to_string(),
            })
    }

    pub fn write(&self, dir: &Path) -> StoreResult<()> {
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|e| StoreError::io(&path, e))
    }

    pub fn read(dir: &Path) -> StoreResult<Self> {
        let path = dir.join(MANIFEST_FILE);
        let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::MissingArtifact { path: path.clone() },
            _ => StoreError::io(&path, e),
        })?;
        serde_json::from_str(&text).map_err(|source| StoreError::Json { path, source })
    }
}

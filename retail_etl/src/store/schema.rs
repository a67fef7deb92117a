use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::models::Table;
use crate::models::star::{DateRow, DimCustomer, DimProduct, DimStore, PerformanceFact, SalesFact};
use crate::star::{DateDimension, Dimension, StarSchema};
use crate::store::csv_io::{read_table, write_table};
use crate::store::manifest::{ArtifactEntry, DateSpan, SchemaManifest};
use crate::store::{StoreError, StoreResult};

fn write_artifact<T: Table>(
    dir: &Path,
    rows: &[T],
    entries: &mut Vec<ArtifactEntry>,
) -> StoreResult<()> {
    write_table(&dir.join(T::file_name()), rows)?;
    entries.push(ArtifactEntry::for_table::<T>(rows.len()));
    Ok(())
}

fn write_all(dir: &Path, schema: &StarSchema) -> StoreResult<SchemaManifest> {
    let mut artifacts = Vec::with_capacity(6);
    write_artifact(dir, &schema.date.rows, &mut artifacts)?;
    write_artifact(dir, &schema.product.rows, &mut artifacts)?;
    write_artifact(dir, &schema.customer.rows, &mut artifacts)?;
    write_artifact(dir, &schema.store.rows, &mut artifacts)?;
    write_artifact(dir, &schema.sales, &mut artifacts)?;
    write_artifact(dir, &schema.performance, &mut artifacts)?;

    let manifest = SchemaManifest {
        built_at: Utc::now(),
        date_range: schema
            .date
            .span()
            .map(|(start, end)| DateSpan { start, end }),
        artifacts,
    };
    manifest.write(dir)?;
    Ok(manifest)
}

/// Swap `staged` into `dest`. A schema already at `dest` is moved aside first
/// and put back if the swap fails.
fn commit(staged: &Path, dest: &Path, previous: &Path) -> StoreResult<()> {
    if previous.exists() {
        fs::remove_dir_all(previous).map_err(|e| StoreError::io(previous, e))?;
    }
    let had_previous = dest.exists();
    if had_previous {
        fs::rename(dest, previous).map_err(|e| StoreError::io(dest, e))?;
    }
    if let Err(e) = fs::rename(staged, dest) {
        if had_previous {
            if let Err(restore) = fs::rename(previous, dest) {
                warn!(path = %previous.display(), error = %restore, "failed to restore previous schema");
            }
        }
        return Err(StoreError::io(dest, e));
    }
    if had_previous {
        if let Err(e) = fs::remove_dir_all(previous) {
            warn!(path = %previous.display(), error = %e, "failed to remove previous schema");
        }
    }
    Ok(())
}

/// Persist all six artifacts plus `manifest.json` under `dest`.
///
/// Artifacts are written to a staging directory beside `dest`, then committed
/// by rename. On any failure before the commit, an existing schema at `dest`
/// is left as it was.
pub fn persist_schema(schema: &StarSchema, dest: &Path) -> StoreResult<SchemaManifest> {
    let invalid = || StoreError::InvalidDestination {
        path: dest.to_path_buf(),
    };
    let name = dest.file_name().ok_or_else(invalid)?.to_string_lossy();
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if dest.exists() && !dest.is_dir() {
        return Err(invalid());
    }
    fs::create_dir_all(&parent).map_err(|e| StoreError::io(&parent, e))?;

    let staging = tempfile::Builder::new()
        .prefix(&format!(".{name}.staging-"))
        .tempdir_in(&parent)
        .map_err(|e| StoreError::io(&parent, e))?;
    debug!(staging = %staging.path().display(), "writing schema artifacts");

    let manifest = write_all(staging.path(), schema)?;

    let previous = parent.join(format!(".{name}.previous"));
    commit(staging.path(), dest, &previous)?;
    // Renamed into place; nothing left for the guard to clean up.
    let _ = staging.keep();

    info!(
        dest = %dest.display(),
        artifacts = manifest.artifacts.len(),
        "committed star schema"
    );
    Ok(manifest)
}

fn load_artifact<T: Table>(dir: &Path, manifest: &SchemaManifest) -> StoreResult<Vec<T>> {
    let entry = manifest.entry::<T>()?;
    let rows: Vec<T> = read_table(&dir.join(&entry.file))?;
    if rows.len() != entry.rows {
        return Err(StoreError::ManifestMismatch {
            artifact: T::NAME.to_string(),
            detail: format!("manifest lists {} rows, file has {}", entry.rows, rows.len()),
        });
    }
    if entry.columns != T::COLUMNS {
        return Err(StoreError::ManifestMismatch {
            artifact: T::NAME.to_string(),
            detail: format!("manifest lists columns {:?}", entry.columns),
        });
    }
    Ok(rows)
}

/// Load a committed schema and check every artifact against the manifest.
pub fn load_schema(dir: &Path) -> StoreResult<(StarSchema, SchemaManifest)> {
    let manifest = SchemaManifest::read(dir)?;
    let schema = StarSchema {
        date: DateDimension::from_rows(load_artifact::<DateRow>(dir, &manifest)?),
        product: Dimension::from_rows(load_artifact::<DimProduct>(dir, &manifest)?),
        customer: Dimension::from_rows(load_artifact::<DimCustomer>(dir, &manifest)?),
        store: Dimension::from_rows(load_artifact::<DimStore>(dir, &manifest)?),
        sales: load_artifact::<SalesFact>(dir, &manifest)?,
        performance: load_artifact::<PerformanceFact>(dir, &manifest)?,
    };
    debug!(dir = %dir.display(), "loaded star schema");
    Ok((schema, manifest))
}

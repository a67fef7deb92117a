use std::{fs::File, io::ErrorKind, path::Path};

use serde::de::DeserializeOwned;

use crate::models::Table;
use crate::store::{StoreError, StoreResult};

fn open(path: &Path) -> StoreResult<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => StoreError::MissingArtifact {
            path: path.to_path_buf(),
        },
        _ => StoreError::io(path, e),
    })
}

fn csv_err(path: &Path) -> impl FnOnce(csv::Error) -> StoreError + '_ {
    move |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `rows` with a header of `T::COLUMNS`. An empty table still gets its header.
pub fn write_table<T: Table>(path: &Path, rows: &[T]) -> StoreResult<()> {
    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err(path))?;
    w.write_record(T::COLUMNS).map_err(csv_err(path))?;
    for row in rows {
        w.serialize(row).map_err(csv_err(path))?;
    }
    w.flush().map_err(|e| StoreError::io(path, e))
}

/// Read a table this crate wrote; the header must equal `T::COLUMNS`.
pub fn read_table<T: Table>(path: &Path) -> StoreResult<Vec<T>> {
    let mut r = csv::Reader::from_reader(open(path)?);
    let found: Vec<String> = r
        .headers()
        .map_err(csv_err(path))?
        .iter()
        .map(str::to_owned)
        .collect();
    if found != T::COLUMNS {
        return Err(StoreError::ColumnMismatch {
            path: path.to_path_buf(),
            expected: T::COLUMNS.iter().map(|c| c.to_string()).collect(),
            found,
        });
    }
    r.deserialize().map(|row| row.map_err(csv_err(path))).collect()
}

/// Read an operator-supplied CSV by header name, tolerating missing and extra
/// columns and ragged rows. Cell text is kept as-is.
///
/// Short records are padded with empty cells and long ones cut to the header.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> StoreResult<Vec<T>> {
    let mut r = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(open(path)?);
    let headers = r.headers().map_err(csv_err(path))?.clone();
    let mut rows = Vec::new();
    for record in r.records() {
        let mut record = record.map_err(csv_err(path))?;
        record.truncate(headers.len());
        while record.len() < headers.len() {
            record.push_field("");
        }
        rows.push(record.deserialize(Some(&headers)).map_err(csv_err(path))?);
    }
    Ok(rows)
}

//! CSV dataset loading.

use crate::data::table::Table;
use crate::error::DataError;
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Rows scanned to infer column types. Covers the whole earnings dataset.
const INFER_SCHEMA_LENGTH: usize = 10_000;

/// Load a comma-delimited file with a header row into a [`Table`].
///
/// Fails with [`DataError::DataFileNotFound`] when the path does not point to
/// an existing file, so callers can tell a misplaced dataset apart from a
/// malformed one.
pub fn load(path: &Path) -> Result<Table, DataError> {
    if !path.is_file() {
        return Err(DataError::DataFileNotFound(path.to_path_buf()));
    }

    debug!("Reading dataset from {}", path.display());

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_LENGTH))
        .finish()
        .and_then(|lf| lf.collect())
        .map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let table = Table::from_dataframe(df);
    info!(
        "Loaded {} records with {} columns from {}",
        table.len(),
        table.width(),
        path.display()
    );

    Ok(table)
}

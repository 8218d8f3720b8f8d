//! Reading the local fallback copy of the sales table.

use std::io::ErrorKind;
use std::path::Path;

use salesdash_core::{read_csv, SalesRecord};

use crate::error::FallbackError;

/// Reads the fallback CSV at `path`.
///
/// Returns `Ok(None)` when no file exists. Purchase dates are parsed
/// leniently, so a bad date cell yields a record without a date rather than
/// an error.
///
/// # Errors
///
/// - [`FallbackError::Io`] if the path exists but cannot be read.
/// - [`FallbackError::Parse`] if the content is not a sales CSV.
/// - [`FallbackError::Empty`] if the file holds no data rows.
pub async fn read_fallback(path: &Path) -> Result<Option<Vec<SalesRecord>>, FallbackError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(FallbackError::Io {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    let records = read_csv(bytes.as_slice()).map_err(|e| FallbackError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;

    if records.is_empty() {
        return Err(FallbackError::Empty {
            path: path.display().to_string(),
        });
    }

    Ok(Some(records))
}

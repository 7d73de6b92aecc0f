// crates/zonium-core/src/loader/json.rs

// ---------------------------------------------------------------------------
// FILE GUARD: This entire module is skipped if 'json' feature is missing.
// ---------------------------------------------------------------------------

use crate::error::{Result, ZoneError};
use crate::model::TimeZoneRecord;
use crate::traits::DataProvider;
use async_trait::async_trait;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Parses the raw dataset (a JSON array of records) from a reader.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<TimeZoneRecord>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Parses the raw dataset from an in-memory buffer.
pub fn parse_records_slice(data: &[u8]) -> Result<Vec<TimeZoneRecord>> {
    Ok(serde_json::from_slice(data)?)
}

/// Reads the dataset from a local JSON file.
///
/// With the `compact` feature, files ending in `.gz` are gunzipped on the fly.
/// Reading happens on Tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataProvider for JsonFileProvider {
    async fn load(&self) -> Result<Vec<TimeZoneRecord>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || parse_records(open_stream(&path)?))
            .await
            .map_err(|e| ZoneError::Provider(format!("file reader task failed: {e}")))?
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Opens a file, buffers it, and wraps it in a Gzip decoder for `.gz` paths.
/// Returns a generic Reader so the caller doesn't care about the compression.
fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            ZoneError::NotFound(format!("no dataset at {}: {e}", path.display()))
        }
        _ => ZoneError::Io(e),
    })?;

    let reader = BufReader::new(file);

    #[cfg(feature = "compact")]
    if path.extension().is_some_and(|ext| ext == "gz") {
        return Ok(Box::new(flate2::read::GzDecoder::new(reader)));
    }

    Ok(Box::new(reader))
}

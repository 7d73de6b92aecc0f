// crates/zonium-core/src/error.rs

//! Error types for loading and querying the time-zone dataset.

use std::sync::Arc;
use thiserror::Error;

/// Errors raised while loading, parsing or indexing the dataset.
///
/// Everything except [`ZoneError::Config`] is a *data source* failure: the
/// provider could not deliver a usable record list. Those surface to the
/// search handler as the error of the generation that triggered the build.
#[derive(Debug, Error)]
pub enum ZoneError {
    /// Reading the dataset from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset was not valid JSON or did not match the record layout.
    #[cfg(feature = "json")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Fetching the dataset over HTTP failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The dataset could not be located.
    #[error("dataset not found: {0}")]
    NotFound(String),

    /// A custom [`DataProvider`](crate::traits::DataProvider) failed.
    #[error("data provider failed: {0}")]
    Provider(String),

    /// The index build failed. Every caller that waited on the build gets
    /// the same provider error; under `BuildPolicy::CacheFailure` so does
    /// every later query.
    #[error("index build failed: {0}")]
    BuildFailed(#[source] Arc<ZoneError>),

    /// Configuration could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ZoneError {
    /// Whether this error came from the data source (load, parse or build).
    pub fn is_data_source(&self) -> bool {
        !matches!(self, ZoneError::Config(_))
    }
}

#[cfg(feature = "fetch")]
impl From<reqwest::Error> for ZoneError {
    fn from(e: reqwest::Error) -> Self {
        ZoneError::Http(e.to_string())
    }
}

impl From<toml::de::Error> for ZoneError {
    fn from(e: toml::de::Error) -> Self {
        ZoneError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ZoneError>;

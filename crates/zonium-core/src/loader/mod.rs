// crates/zonium-core/src/loader/mod.rs

//! # Data Loader
//!
//! Providers that produce the raw record list for the index: an in-memory
//! one, a file reader (plain or gzip JSON) and an HTTP fetcher. Each is a
//! [`DataProvider`]; pick one directly or let [`provider_for`] map a
//! configured [`DataSource`] to the matching implementation.

use crate::config::DataSource;
use crate::error::Result;
use crate::model::TimeZoneRecord;
use crate::traits::DataProvider;
use async_trait::async_trait;

#[cfg(feature = "json")]
mod json;
#[cfg(feature = "json")]
pub use json::{parse_records, parse_records_slice, JsonFileProvider};

#[cfg(feature = "fetch")]
mod http;
#[cfg(feature = "fetch")]
pub use http::HttpProvider;

/// Pinned upstream dataset: the raw zone list of `@vvo/tzdb`.
pub const DEFAULT_DATASET_URL: &str =
    "https://unpkg.com/@vvo/tzdb@6.96.0/raw-time-zones.json";

/// Serves a fixed record list from memory.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    records: Vec<TimeZoneRecord>,
}

impl StaticProvider {
    pub fn new(records: Vec<TimeZoneRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl DataProvider for StaticProvider {
    async fn load(&self) -> Result<Vec<TimeZoneRecord>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory records", self.records.len())
    }
}

/// Builds the provider for a configured source.
///
/// Fails with [`ZoneError::Config`](crate::ZoneError::Config) when the crate
/// was built without the feature the source needs (`fetch` for URLs, `json`
/// for files).
pub fn provider_for(source: &DataSource) -> Result<Box<dyn DataProvider>> {
    match source {
        #[cfg(feature = "fetch")]
        DataSource::Url(url) => Ok(Box::new(HttpProvider::new(url.clone()))),
        #[cfg(not(feature = "fetch"))]
        DataSource::Url(url) => Err(crate::error::ZoneError::Config(format!(
            "cannot fetch {url}: built without the `fetch` feature"
        ))),

        #[cfg(feature = "json")]
        DataSource::Path(path) => Ok(Box::new(JsonFileProvider::new(path.clone()))),
        #[cfg(not(feature = "json"))]
        DataSource::Path(path) => Err(crate::error::ZoneError::Config(format!(
            "cannot read {}: built without the `json` feature",
            path.display()
        ))),
    }
}

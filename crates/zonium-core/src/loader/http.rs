// crates/zonium-core/src/loader/http.rs

use super::parse_records_slice;
use crate::error::{Result, ZoneError};
use crate::model::TimeZoneRecord;
use crate::traits::DataProvider;
use async_trait::async_trait;
use tracing::debug;

/// Downloads the dataset with a single GET request.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    url: String,
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DataProvider for HttpProvider {
    async fn load(&self) -> Result<Vec<TimeZoneRecord>> {
        debug!(url = %self.url, "fetching time-zone dataset");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ZoneError::Http(format!("GET {} returned {status}", self.url)));
        }

        let body = response.bytes().await?;
        parse_records_slice(&body)
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}

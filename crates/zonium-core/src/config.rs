// crates/zonium-core/src/config.rs

//! Runtime configuration, readable from TOML.
//!
//! ```toml
//! build_policy = "cache_failure"
//! cancel_mode = "interrupt"
//!
//! [source]
//! path = "data/raw-time-zones.json.gz"
//! ```
//!
//! Every key is optional; the defaults fetch the pinned upstream dataset,
//! retry failed builds and discard superseded searches on delivery.

use crate::error::{Result, ZoneError};
use crate::index::BuildPolicy;
use crate::loader::DEFAULT_DATASET_URL;
use crate::stream::CancelMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Url(DEFAULT_DATASET_URL.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoniumConfig {
    pub source: DataSource,
    pub build_policy: BuildPolicy,
    pub cancel_mode: CancelMode,
}

impl ZoniumConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ZoneError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}

// crates/zonium-core/src/lib.rs

//! zonium-core
//! ===========
//!
//! Keyword search over the `@vvo/tzdb` time-zone list, driven by a
//! latest-wins async pipeline so that rapid keystrokes only ever surface the
//! result of the newest query.
//!
//! ```no_run
//! use std::sync::Arc;
//! use zonium_core::prelude::*;
//!
//! # async fn demo() -> zonium_core::Result<()> {
//! let index = Arc::new(TimeZoneIndex::new(HttpProvider::new(DEFAULT_DATASET_URL)));
//! let names = index.search_names("london").await?;
//! assert!(names.iter().any(|n| n == "Europe/London"));
//!
//! let session = ZoneSearch::new(Arc::clone(&index));
//! let mut state = session.subscribe();
//! session.update("lo");
//! session.update("lond"); // supersedes "lo"
//! state.changed().await.ok();
//! let current = state.borrow();
//! println!("{}: {:?}", current.status_line(), current.results);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod index;
pub mod loader;
pub mod model;
pub mod session;
pub mod stream;
pub mod text;
pub mod traits;

// Re-exports
pub use crate::config::{DataSource, ZoniumConfig};
pub use crate::error::{Result, ZoneError};
pub use crate::index::{BuildPolicy, IndexStats, TimeZoneIndex};
pub use crate::loader::{provider_for, StaticProvider, DEFAULT_DATASET_URL};
pub use crate::model::{IndexedRecord, TimeZoneRecord};
pub use crate::session::{SearchState, ZoneSearch};
pub use crate::stream::{CancelMode, Generation, LatestWinsStream};
pub use crate::traits::{DataProvider, KeywordMatch};

#[cfg(feature = "fetch")]
pub use crate::loader::HttpProvider;
#[cfg(feature = "json")]
pub use crate::loader::{parse_records, parse_records_slice, JsonFileProvider};

pub mod prelude {
    pub use crate::config::{DataSource, ZoniumConfig};
    pub use crate::error::{Result, ZoneError};
    pub use crate::index::{BuildPolicy, TimeZoneIndex};
    pub use crate::loader::{StaticProvider, DEFAULT_DATASET_URL};
    pub use crate::model::{IndexedRecord, TimeZoneRecord};
    pub use crate::session::{SearchState, ZoneSearch};
    pub use crate::stream::{CancelMode, LatestWinsStream};
    pub use crate::traits::{DataProvider, KeywordMatch};

    #[cfg(feature = "fetch")]
    pub use crate::loader::HttpProvider;
    #[cfg(feature = "json")]
    pub use crate::loader::JsonFileProvider;
}

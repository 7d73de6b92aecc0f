// crates/zonium-core/src/traits.rs
use crate::error::Result;
use crate::model::TimeZoneRecord;
use crate::text::fold_query;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of the raw time-zone dataset.
///
/// The index calls [`DataProvider::load`] at most once per successful build,
/// so implementations do not need their own caching. Failures should be
/// reported as data-source errors ([`ZoneError::Io`], [`ZoneError::Http`],
/// [`ZoneError::Provider`], ...).
///
/// # Examples
/// ```rust
/// use async_trait::async_trait;
/// use zonium_core::{DataProvider, Result, TimeZoneRecord};
///
/// struct OneZone;
///
/// #[async_trait]
/// impl DataProvider for OneZone {
///     async fn load(&self) -> Result<Vec<TimeZoneRecord>> {
///         Ok(vec![TimeZoneRecord {
///             name: Some("Europe/London".into()),
///             ..Default::default()
///         }])
///     }
/// }
/// ```
///
/// [`ZoneError::Io`]: crate::ZoneError::Io
/// [`ZoneError::Http`]: crate::ZoneError::Http
/// [`ZoneError::Provider`]: crate::ZoneError::Provider
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Loads every record of the dataset, in dataset order.
    async fn load(&self) -> Result<Vec<TimeZoneRecord>>;

    /// Short human-readable description used in log output.
    fn describe(&self) -> String {
        "custom provider".to_string()
    }
}

#[async_trait]
impl<P: DataProvider + ?Sized> DataProvider for Arc<P> {
    async fn load(&self) -> Result<Vec<TimeZoneRecord>> {
        (**self).load().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[async_trait]
impl<P: DataProvider + ?Sized> DataProvider for Box<P> {
    async fn load(&self) -> Result<Vec<TimeZoneRecord>> {
        (**self).load().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Substring matching over a precomputed, already folded keyword set.
pub trait KeywordMatch {
    /// Lower-cased, trimmed keywords.
    fn keywords(&self) -> &[String];

    /// Returns `true` if any keyword contains the already folded query.
    #[inline]
    fn matches_folded(&self, folded: &str) -> bool {
        self.keywords().iter().any(|k| k.contains(folded))
    }

    /// Case-insensitive substring match.
    #[inline]
    fn matches(&self, q: &str) -> bool {
        self.matches_folded(&fold_query(q))
    }
}

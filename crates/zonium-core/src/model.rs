// crates/zonium-core/src/model.rs

//! Record types: the raw time-zone entry and its indexed form.

use crate::text::normalize_keyword;
use crate::traits::KeywordMatch;
use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Raw time-zone entry as it comes from the `@vvo/tzdb` dataset:
/// {
///   "name": "Europe/London",
///   "alternativeName": "British Time",
///   "group": ["Europe/London", "Europe/Belfast", ...],
///   "continentCode": "EU",
///   "continentName": "Europe",
///   "countryName": "United Kingdom",
///   "countryCode": "GB",
///   "mainCities": ["London", "Birmingham", ...],
///   "rawOffsetInMinutes": 0,
///   "abbreviation": "GMT",
///   "rawFormat": "+00:00 Greenwich Mean Time - London, ..."
/// }
///
/// Text fields that are missing, `null` or not strings deserialize to `None`
/// and never take part in matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeZoneRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub alternative_name: Option<String>,
    /// Zone names sharing this entry. Carried, not indexed.
    #[serde(default, deserialize_with = "lenient_texts")]
    pub group: Vec<String>,
    /// Carried, not indexed.
    #[serde(default, deserialize_with = "lenient_text")]
    pub continent_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub continent_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub country_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub country_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_texts")]
    pub main_cities: Vec<String>,
    #[serde(default)]
    pub raw_offset_in_minutes: i32,
    #[serde(default, deserialize_with = "lenient_text")]
    pub abbreviation: Option<String>,
    /// Carried, not indexed.
    #[serde(default, deserialize_with = "lenient_text")]
    pub raw_format: Option<String>,
}

impl TimeZoneRecord {
    /// Name shown to the user: `name`, falling back to `alternativeName`.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.alternative_name.as_deref())
    }

    /// The searchable text fields in index order, absent ones skipped.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> + '_ {
        [
            &self.name,
            &self.alternative_name,
            &self.country_name,
            &self.country_code,
            &self.continent_name,
            &self.abbreviation,
        ]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .chain(self.main_cities.iter().map(String::as_str))
    }
}

/// A record paired with its precomputed keyword set.
///
/// Cloning is cheap: both the record and the keywords are shared.
#[derive(Debug, Clone)]
pub struct IndexedRecord {
    record: Arc<TimeZoneRecord>,
    keywords: Arc<[String]>,
}

impl IndexedRecord {
    pub fn new(record: Arc<TimeZoneRecord>) -> Self {
        let keywords = record
            .searchable_fields()
            .map(normalize_keyword)
            .filter(|k| !k.is_empty())
            .collect();
        Self { record, keywords }
    }

    pub fn record(&self) -> &TimeZoneRecord {
        &self.record
    }

    pub fn shared_record(&self) -> Arc<TimeZoneRecord> {
        Arc::clone(&self.record)
    }
}

impl KeywordMatch for IndexedRecord {
    fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Text(String),
    Other(IgnoredAny),
}

impl Lenient {
    fn into_text(self) -> Option<String> {
        match self {
            Lenient::Text(s) => Some(s),
            Lenient::Other(_) => None,
        }
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Lenient>::deserialize(d)?.and_then(Lenient::into_text))
}

fn lenient_texts<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<Lenient>>::deserialize(d)?
        .unwrap_or_default()
        .into_iter()
        .filter_map(Lenient::into_text)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn new_york() -> TimeZoneRecord {
        TimeZoneRecord {
            name: Some("America/New_York".into()),
            country_name: Some("United States".into()),
            country_code: Some("US".into()),
            main_cities: vec!["New York".into(), " Los Angeles ".into()],
            raw_offset_in_minutes: -300,
            ..Default::default()
        }
    }

    #[test]
    fn keywords_cover_text_fields_and_cities() {
        let indexed = IndexedRecord::new(Arc::new(new_york()));
        assert_eq!(
            indexed.keywords(),
            &[
                "america/new_york".to_string(),
                "united states".into(),
                "us".into(),
                "new york".into(),
                "los angeles".into(),
            ]
        );
    }

    #[test]
    fn absent_fields_produce_no_keywords() {
        let indexed = IndexedRecord::new(Arc::new(TimeZoneRecord::default()));
        assert!(indexed.keywords().is_empty());
        assert!(!indexed.matches(""));
    }

    #[test]
    fn record_is_shared_not_copied() {
        let record = Arc::new(new_york());
        let indexed = IndexedRecord::new(Arc::clone(&record));
        assert!(Arc::ptr_eq(&record, &indexed.shared_record()));
    }

    #[test]
    fn display_name_falls_back_to_alternative() {
        let record = TimeZoneRecord {
            alternative_name: Some("Pacific Time".into()),
            ..Default::default()
        };
        assert_eq!(record.display_name(), Some("Pacific Time"));
        assert_eq!(new_york().display_name(), Some("America/New_York"));
        assert_eq!(TimeZoneRecord::default().display_name(), None);
    }
}

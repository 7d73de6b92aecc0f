// crates/zonium-core/src/text.rs

//! Text normalization shared by the indexer and the query path.
//!
//! Keywords are trimmed and lower-cased once at index time. Queries are only
//! lower-cased: surrounding whitespace in a query is significant, so
//! `"new "` matches `"new york"` but not `"newcastle"`.

/// Normalizes a record field into a keyword.
#[inline]
pub fn normalize_keyword(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Folds a query for substring comparison against keywords.
#[inline]
pub fn fold_query(q: &str) -> String {
    q.to_lowercase()
}

/// Returns `true` when the text is worth searching for.
///
/// Absent, empty and whitespace-only input is not.
#[inline]
pub fn is_meaningful(text: Option<&str>) -> bool {
    text.is_some_and(|t| !t.trim().is_empty())
}

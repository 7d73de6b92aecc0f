// crates/zonium-core/src/index.rs

//! Lazily built keyword index over the time-zone dataset.
//!
//! The index is an explicit handle, usually shared as
//! `Arc<TimeZoneIndex<P>>` by whoever composes the application. The first
//! query spawns the build as its own task; every query issued while that
//! task runs joins it and receives its outcome, so the provider is loaded
//! once per attempt. Cancelling a query only drops that query's wait. After
//! a successful build the record list is immutable and shared.

use crate::error::{Result, ZoneError};
use crate::model::IndexedRecord;
use crate::text::{fold_query, is_meaningful};
use crate::traits::{DataProvider, KeywordMatch};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// What happens to later queries after a failed build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildPolicy {
    /// The failure is returned to the callers waiting on that build; the
    /// next query starts a fresh build.
    #[default]
    Retry,
    /// The failure is remembered and every later query fails with it for
    /// the lifetime of the index.
    CacheFailure,
}

/// Aggregate counts over the built index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub records: usize,
    pub keywords: usize,
}

type BuildOutcome = std::result::Result<Arc<[IndexedRecord]>, Arc<ZoneError>>;
type PendingBuild = Shared<BoxFuture<'static, BuildOutcome>>;

enum BuildState {
    Unbuilt,
    Building { attempt: usize, pending: PendingBuild },
    Built(Arc<[IndexedRecord]>),
    Failed(Arc<ZoneError>),
}

pub struct TimeZoneIndex<P> {
    provider: Arc<P>,
    policy: BuildPolicy,
    state: Mutex<BuildState>,
    attempts: AtomicUsize,
}

impl<P: DataProvider + 'static> TimeZoneIndex<P> {
    pub fn new(provider: P) -> Self {
        Self::with_policy(provider, BuildPolicy::default())
    }

    pub fn with_policy(provider: P, policy: BuildPolicy) -> Self {
        Self {
            provider: Arc::new(provider),
            policy,
            state: Mutex::new(BuildState::Unbuilt),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn policy(&self) -> BuildPolicy {
        self.policy
    }

    /// Whether a successful build has completed.
    pub fn is_built(&self) -> bool {
        matches!(*self.state.lock(), BuildState::Built(_))
    }

    /// Number of times the provider has been asked to load.
    pub fn build_attempts(&self) -> usize {
        self.attempts.load(Ordering::Acquire)
    }

    /// Every indexed record in dataset order, building the index if needed.
    ///
    /// Build failures surface as [`ZoneError::BuildFailed`] wrapping the
    /// provider's error, shared by every caller of the failed attempt.
    ///
    /// # Panics
    ///
    /// Starting a build outside a Tokio runtime panics.
    pub async fn records(&self) -> Result<Arc<[IndexedRecord]>> {
        let (attempt, pending) = {
            let mut state = self.state.lock();
            match &*state {
                BuildState::Built(records) => return Ok(Arc::clone(records)),
                BuildState::Failed(e) => return Err(ZoneError::BuildFailed(Arc::clone(e))),
                BuildState::Building { attempt, pending } => (*attempt, pending.clone()),
                BuildState::Unbuilt => {
                    let attempt = self.attempts.fetch_add(1, Ordering::AcqRel) + 1;
                    let pending = self.spawn_build(attempt);
                    *state = BuildState::Building {
                        attempt,
                        pending: pending.clone(),
                    };
                    (attempt, pending)
                }
            }
        };

        let outcome = pending.await;
        self.settle(attempt, &outcome);
        outcome.map_err(ZoneError::BuildFailed)
    }

    /// Records having a keyword that contains `text`, case-insensitively.
    ///
    /// Absent, empty and whitespace-only text yields an empty list without
    /// touching the index or the provider. Otherwise the result keeps dataset
    /// order, with no ranking or de-duplication.
    pub async fn search<'a>(&self, text: impl Into<Option<&'a str>>) -> Result<Vec<IndexedRecord>> {
        let text: Option<&str> = text.into();
        let Some(text) = text.filter(|t| is_meaningful(Some(*t))) else {
            return Ok(Vec::new());
        };

        let records = self.records().await?;
        let q = fold_query(text);
        Ok(records
            .iter()
            .filter(|r| r.matches_folded(&q))
            .cloned()
            .collect())
    }

    /// Display names of the records matching `text`.
    ///
    /// Records with neither a name nor an alternative name are skipped.
    pub async fn search_names<'a>(&self, text: impl Into<Option<&'a str>>) -> Result<Vec<String>> {
        Ok(self
            .search(text)
            .await?
            .iter()
            .filter_map(|r| r.record().display_name().map(str::to_owned))
            .collect())
    }

    pub async fn stats(&self) -> Result<IndexStats> {
        let records = self.records().await?;
        Ok(IndexStats {
            records: records.len(),
            keywords: records.iter().map(|r| r.keywords().len()).sum(),
        })
    }

    /// Runs one load on its own task so no single caller owns it.
    fn spawn_build(&self, attempt: usize) -> PendingBuild {
        let provider = Arc::clone(&self.provider);
        tokio::spawn(async move { build(&*provider, attempt).await.map_err(Arc::new) })
            .map(|joined| {
                joined.unwrap_or_else(|e| Err(Arc::new(ZoneError::Provider(format!("index build task failed: {e}")))))
            })
            .boxed()
            .shared()
    }

    /// Records the outcome of `attempt` unless a later attempt replaced it.
    fn settle(&self, attempt: usize, outcome: &BuildOutcome) {
        let mut state = self.state.lock();
        if !matches!(&*state, BuildState::Building { attempt: current, .. } if *current == attempt) {
            return;
        }
        *state = match (outcome, self.policy) {
            (Ok(records), _) => BuildState::Built(Arc::clone(records)),
            (Err(e), BuildPolicy::CacheFailure) => BuildState::Failed(Arc::clone(e)),
            (Err(_), BuildPolicy::Retry) => BuildState::Unbuilt,
        };
    }
}

async fn build<P: DataProvider + ?Sized>(provider: &P, attempt: usize) -> Result<Arc<[IndexedRecord]>> {
    debug!(provider = %provider.describe(), attempt, "building time-zone index");

    let raw = provider.load().await.inspect_err(|e| {
        warn!(provider = %provider.describe(), attempt, error = %e, "time-zone dataset failed to load");
    })?;

    let records: Arc<[IndexedRecord]> = raw
        .into_iter()
        .map(|r| IndexedRecord::new(Arc::new(r)))
        .collect();
    debug!(records = records.len(), "time-zone index built");
    Ok(records)
}

impl<P> std::fmt::Debug for TimeZoneIndex<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.state.lock() {
            BuildState::Unbuilt => "unbuilt",
            BuildState::Building { .. } => "building",
            BuildState::Built(_) => "built",
            BuildState::Failed(_) => "failed",
        };
        f.debug_struct("TimeZoneIndex")
            .field("policy", &self.policy)
            .field("state", &state)
            .field("attempts", &self.attempts.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimeZoneRecord;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicBool;
    use tokio::sync::Notify;

    fn zone(name: &str, country: &str, cities: &[&str]) -> TimeZoneRecord {
        TimeZoneRecord {
            name: Some(name.into()),
            country_name: Some(country.into()),
            main_cities: cities.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    fn dataset() -> Vec<TimeZoneRecord> {
        vec![
            zone("America/New_York", "United States", &["New York", "Los Angeles"]),
            zone("Europe/London", "United Kingdom", &["London"]),
            zone("Australia/Sydney", "Australia", &["Sydney", "Newcastle"]),
        ]
    }

    /// Counts loads, optionally waits for a release signal, and can fail
    /// until told otherwise.
    #[derive(Default)]
    struct TestProvider {
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
        failing: AtomicBool,
    }

    impl TestProvider {
        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self {
                failing: AtomicBool::new(true),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DataProvider for TestProvider {
        async fn load(&self) -> Result<Vec<TimeZoneRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(ZoneError::Provider("dataset unavailable".into()));
            }
            Ok(dataset())
        }
    }

    #[tokio::test]
    async fn blank_queries_never_touch_the_provider() {
        let index = TimeZoneIndex::new(TestProvider::default());
        assert!(index.search("").await.unwrap().is_empty());
        assert!(index.search("   ").await.unwrap().is_empty());
        assert!(index.search(None::<&str>).await.unwrap().is_empty());
        assert_eq!(index.provider().calls(), 0);
        assert!(!index.is_built());
    }

    #[tokio::test]
    async fn matches_names_and_cities_case_insensitively() {
        let index = TimeZoneIndex::new(TestProvider::default());
        let names = index.search_names("NEW").await.unwrap();
        assert_eq!(names, vec!["America/New_York", "Australia/Sydney"]);

        let names = index.search_names("kingdom").await.unwrap();
        assert_eq!(names, vec!["Europe/London"]);

        assert!(index.search("zzz-no-match").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn query_whitespace_is_significant() {
        let index = TimeZoneIndex::new(TestProvider::default());
        let names = index.search_names("new ").await.unwrap();
        assert_eq!(names, vec!["America/New_York"]);
    }

    #[tokio::test]
    async fn concurrent_searches_share_one_build() {
        let gate = Arc::new(Notify::new());
        let index = TimeZoneIndex::new(TestProvider::gated(Arc::clone(&gate)));

        let releaser = async {
            tokio::task::yield_now().await;
            gate.notify_one();
        };
        let (a, b, ()) = tokio::join!(index.search("lon"), index.search("syd"), releaser);

        assert_eq!(a.unwrap().len(), 1);
        assert_eq!(b.unwrap().len(), 1);
        assert_eq!(index.provider().calls(), 1);

        index.search("new").await.unwrap();
        assert_eq!(index.provider().calls(), 1);
        assert_eq!(index.build_attempts(), 1);
    }

    #[tokio::test]
    async fn retry_policy_rebuilds_after_failure() {
        let index = TimeZoneIndex::new(TestProvider::failing());

        let err = index.search("lon").await.unwrap_err();
        assert!(err.is_data_source());
        assert!(matches!(&err, ZoneError::BuildFailed(source) if matches!(**source, ZoneError::Provider(_))));
        assert!(!index.is_built());

        index.provider().failing.store(false, Ordering::SeqCst);
        assert_eq!(index.search_names("lon").await.unwrap(), vec!["Europe/London"]);
        assert_eq!(index.provider().calls(), 2);
        assert!(index.is_built());
    }

    #[tokio::test]
    async fn concurrent_searches_share_one_failed_build() {
        let gate = Arc::new(Notify::new());
        let provider = TestProvider {
            failing: AtomicBool::new(true),
            ..TestProvider::gated(Arc::clone(&gate))
        };
        let index = TimeZoneIndex::new(provider);

        let releaser = async {
            tokio::task::yield_now().await;
            gate.notify_one();
        };
        let (a, b, c, ()) = tokio::join!(index.search("lon"), index.search("syd"), index.search("new"), releaser);

        for result in [a, b, c] {
            assert!(matches!(result, Err(ZoneError::BuildFailed(_))));
        }
        assert_eq!(index.provider().calls(), 1);
        assert!(!index.is_built());

        // The failed attempt is not memoized; the next query loads again.
        index.provider().failing.store(false, Ordering::SeqCst);
        gate.notify_one();
        assert_eq!(index.search_names("lon").await.unwrap(), vec!["Europe/London"]);
        assert_eq!(index.provider().calls(), 2);
    }

    #[tokio::test]
    async fn cancelled_callers_do_not_restart_the_build() {
        let gate = Arc::new(Notify::new());
        let index = Arc::new(TimeZoneIndex::new(TestProvider::gated(Arc::clone(&gate))));

        for _ in 0..3 {
            let index = Arc::clone(&index);
            let waiter = tokio::spawn(async move { index.search("lon").await });
            tokio::task::yield_now().await;
            waiter.abort();
            assert!(waiter.await.unwrap_err().is_cancelled());
        }

        gate.notify_one();
        assert_eq!(index.search_names("lon").await.unwrap(), vec!["Europe/London"]);
        assert_eq!(index.provider().calls(), 1);
        assert_eq!(index.build_attempts(), 1);
    }

    #[tokio::test]
    async fn cache_failure_policy_fails_forever() {
        let index = TimeZoneIndex::with_policy(TestProvider::failing(), BuildPolicy::CacheFailure);

        let first = index.search("lon").await.unwrap_err();
        assert!(matches!(first, ZoneError::BuildFailed(_)));

        index.provider().failing.store(false, Ordering::SeqCst);
        let second = index.search("lon").await.unwrap_err();
        assert!(matches!(second, ZoneError::BuildFailed(_)));
        assert_eq!(index.provider().calls(), 1);
    }

    #[tokio::test]
    async fn stats_count_records_and_keywords() {
        let index = TimeZoneIndex::new(TestProvider::default());
        let stats = index.stats().await.unwrap();
        assert_eq!(
            stats,
            IndexStats {
                records: 3,
                keywords: 11,
            }
        );
    }

    #[tokio::test]
    async fn results_share_the_built_records() {
        let index = TimeZoneIndex::new(TestProvider::default());
        let hits = index.search("london").await.unwrap();
        let all = index.records().await.unwrap();
        assert!(Arc::ptr_eq(&hits[0].shared_record(), &all[1].shared_record()));
    }
}

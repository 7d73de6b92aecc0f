//! Error handling example for zonium-rs
//!
//! Shows how data-source failures surface and how the two build policies
//! differ when the dataset is temporarily unavailable.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use zonium_core::prelude::*;

/// Fails the first `failures` loads, then serves a single zone.
struct FlakyProvider {
    failures: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl DataProvider for FlakyProvider {
    async fn load(&self) -> Result<Vec<TimeZoneRecord>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(ZoneError::Http(format!("attempt {} timed out", call + 1)));
        }
        Ok(vec![TimeZoneRecord {
            name: Some("Europe/London".into()),
            main_cities: vec!["London".into()],
            ..Default::default()
        }])
    }

    fn describe(&self) -> String {
        "flaky provider".into()
    }
}

async fn try_policy(policy: BuildPolicy) {
    println!("--- {policy:?} ---");
    let provider = FlakyProvider {
        failures: 1,
        calls: AtomicUsize::new(0),
    };
    let index = TimeZoneIndex::with_policy(provider, policy);

    for attempt in 1..=2 {
        match index.search_names("london").await {
            Ok(names) => println!("  search {attempt}: {names:?}"),
            Err(e) => println!("  search {attempt}: failed ({e}, data source: {})", e.is_data_source()),
        }
    }
    println!("  provider calls: {}\n", index.build_attempts());
}

#[tokio::main]
async fn main() {
    println!("=== zonium-rs Error Handling ===\n");

    try_policy(BuildPolicy::Retry).await;
    try_policy(BuildPolicy::CacheFailure).await;

    // A session turns failures into an error state instead of stale results.
    println!("--- search session ---");
    let index = Arc::new(TimeZoneIndex::new(FlakyProvider {
        failures: usize::MAX,
        calls: AtomicUsize::new(0),
    }));
    let session = ZoneSearch::new(index);
    let mut states = session.subscribe();
    session.update("lon");
    if states.changed().await.is_ok() {
        let state = states.borrow();
        println!("  results: {:?}, error: {:?}", state.results, state.error);
    }

    match ZoniumConfig::from_toml_str("build_policy = \"sometimes\"") {
        Ok(_) => println!("unexpected: config accepted"),
        Err(e) => println!("\nconfig rejected: {e}"),
    }
}

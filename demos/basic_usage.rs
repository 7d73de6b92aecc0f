//! Basic usage example for zonium-rs
//!
//! Searches a handful of built-in zones, or a dataset file passed as the
//! first argument (e.g. a downloaded `raw-time-zones.json`).

use std::sync::Arc;
use zonium_core::prelude::*;

fn sample_zones() -> Vec<TimeZoneRecord> {
    let zone = |name: &str, country: &str, code: &str, abbr: &str, cities: &[&str], offset: i32| {
        TimeZoneRecord {
            name: Some(name.into()),
            country_name: Some(country.into()),
            country_code: Some(code.into()),
            abbreviation: Some(abbr.into()),
            main_cities: cities.iter().map(|c| c.to_string()).collect(),
            raw_offset_in_minutes: offset,
            ..Default::default()
        }
    };
    vec![
        zone("America/New_York", "United States", "US", "EST", &["New York City", "Philadelphia"], -300),
        zone("Europe/London", "United Kingdom", "GB", "GMT", &["London", "Birmingham"], 0),
        zone("Europe/Berlin", "Germany", "DE", "CET", &["Berlin", "Hamburg"], 60),
        zone("Asia/Tokyo", "Japan", "JP", "JST", &["Tokyo", "Yokohama"], 540),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== zonium-rs Basic Usage ===\n");

    let provider: Box<dyn DataProvider> = match std::env::args().nth(1) {
        Some(path) => Box::new(JsonFileProvider::new(path)),
        None => Box::new(StaticProvider::new(sample_zones())),
    };
    let index = Arc::new(TimeZoneIndex::new(provider));

    let stats = index.stats().await?;
    println!("Loaded {} zones ({} keywords)\n", stats.records, stats.keywords);

    for query in ["london", "new", "CET", "japan", "  "] {
        let names = index.search_names(query).await?;
        println!("{query:?} -> {names:?}");
    }

    // Full records are available too.
    for hit in index.search("tokyo").await? {
        let record = hit.record();
        println!(
            "\n{} (UTC{:+}h), keywords: {:?}",
            record.name.as_deref().unwrap_or("?"),
            record.raw_offset_in_minutes / 60,
            hit.keywords()
        );
    }

    Ok(())
}

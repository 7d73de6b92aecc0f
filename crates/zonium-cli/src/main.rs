//! zonium: command-line interface for zonium-core
//!
//! Searches the time-zone database from your terminal, either one query at a
//! time or interactively, feeding every input line through the same
//! latest-wins search session a search box would use.
//!
//! Usage examples
//! --------------
//!
//! - Find zones by city, country, zone name or abbreviation
//!   $ zonium search london
//!   $ zonium search "new york"
//!
//! - Use a local copy of the dataset
//!   $ zonium --input raw-time-zones.json.gz search tokyo
//!
//! - Show index statistics
//!   $ zonium stats
//!
//! - Type-ahead mode: each stdin line is one state of the search box
//!   $ printf 'l\nlo\nlon\n' | zonium interactive
//!
//! Data source
//! -----------
//!
//! By default the dataset is fetched from the pinned `@vvo/tzdb` release on
//! unpkg. `--input` reads a local `.json` / `.json.gz` file instead, and
//! `--config <file.toml>` supplies source, build policy and cancel mode.
//! Log output goes to stderr and honours `RUST_LOG`.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use zonium_core::prelude::*;
use zonium_core::provider_for;
use zonium_core::text::is_meaningful;

/// How long interactive mode waits for the last query after stdin closes.
const FINAL_RESULT_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    setup_tracing(args.verbose);

    let config = resolve_config(&args)?;
    let provider = provider_for(&config.source)?;
    let index = Arc::new(TimeZoneIndex::with_policy(provider, config.build_policy));

    match args.command {
        Commands::Search { query } => {
            let names = index.search_names(query.as_str()).await?;
            if names.is_empty() {
                println!("No matching Timezones for: {query}");
            } else {
                for name in names {
                    println!("{name}");
                }
            }
        }

        Commands::Stats => {
            let stats = index.stats().await?;
            println!("Time-zone index ({}):", index.provider().describe());
            println!("  Records: {}", stats.records);
            println!("  Keywords: {}", stats.keywords);
        }

        Commands::Interactive => interactive(index, config.cancel_mode).await?,
    }

    Ok(())
}

fn setup_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("zonium=info,zonium_core=info"),
        1 => EnvFilter::new("zonium=debug,zonium_core=debug"),
        _ => EnvFilter::new("zonium=trace,zonium_core=trace"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file first, then command-line overrides.
fn resolve_config(args: &CliArgs) -> anyhow::Result<ZoniumConfig> {
    let mut config = match &args.config {
        Some(path) => ZoniumConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ZoniumConfig::default(),
    };

    if let Some(path) = &args.input {
        config.source = DataSource::Path(path.clone());
    }
    if let Some(url) = &args.url {
        config.source = DataSource::Url(url.clone());
    }
    if args.cache_failures {
        config.build_policy = BuildPolicy::CacheFailure;
    }
    Ok(config)
}

async fn interactive<P: DataProvider + 'static>(
    index: Arc<TimeZoneIndex<P>>,
    cancel_mode: CancelMode,
) -> anyhow::Result<()> {
    let session = ZoneSearch::with_cancel_mode(index, cancel_mode);
    let mut states = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut stdin_open = true;
    let mut pending = false;
    let deadline = tokio::time::sleep(FINAL_RESULT_TIMEOUT);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            biased;

            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                pending = false;
                print_state(&states.borrow_and_update());
                if !stdin_open {
                    break;
                }
            }

            line = lines.next_line(), if stdin_open => match line.context("reading stdin")? {
                Some(line) => {
                    pending = is_meaningful(Some(line.as_str()));
                    session.update(&line);
                }
                None => {
                    stdin_open = false;
                    if !pending {
                        break;
                    }
                    deadline.as_mut().reset(Instant::now() + FINAL_RESULT_TIMEOUT);
                }
            },

            () = &mut deadline, if !stdin_open => {
                warn!("no result for the last query after {FINAL_RESULT_TIMEOUT:?}");
                break;
            }
        }
    }

    Ok(())
}

fn print_state(state: &SearchState) {
    if !state.popup_shown {
        println!("(cleared)");
        return;
    }
    if let Some(error) = &state.error {
        println!("Search failed: {error}");
        return;
    }
    println!("{}", state.status_line());
    for name in &state.results {
        println!("  {name}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn defaults_fetch_the_upstream_dataset() {
        let config = resolve_config(&parse(&["zonium", "search", "london"])).unwrap();
        assert_eq!(config, ZoniumConfig::default());
    }

    #[test]
    fn input_flag_selects_a_local_file() {
        let args = parse(&["zonium", "--input", "zones.json.gz", "stats"]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.source, DataSource::Path(PathBuf::from("zones.json.gz")));
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let args = parse(&["zonium", "search", "tokyo", "--url", "http://localhost/tz.json", "--cache-failures"]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.source, DataSource::Url("http://localhost/tz.json".into()));
        assert_eq!(config.build_policy, BuildPolicy::CacheFailure);
        assert!(matches!(args.command, Commands::Search { query } if query == "tokyo"));
    }

    #[test]
    fn input_and_url_conflict() {
        let result = CliArgs::try_parse_from(["zonium", "-i", "a.json", "-u", "http://x", "stats"]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_config_file_is_reported() {
        let args = parse(&["zonium", "--config", "/no/such/zonium.toml", "stats"]);
        let err = resolve_config(&args).unwrap_err();
        assert!(err.to_string().contains("/no/such/zonium.toml"));
    }
}

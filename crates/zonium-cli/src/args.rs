use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for zonium
#[derive(Debug, Parser)]
#[command(
    name = "zonium",
    version,
    about = "Search the time-zone database by city, country, zone name or abbreviation"
)]
pub struct CliArgs {
    /// Path to a local dataset (raw-time-zones.json or .json.gz)
    #[arg(short = 'i', long = "input", global = true, conflicts_with = "url")]
    pub input: Option<PathBuf>,

    /// URL to fetch the dataset from (default: pinned @vvo/tzdb release)
    #[arg(short = 'u', long = "url", global = true)]
    pub url: Option<String>,

    /// TOML configuration file; command-line flags take precedence
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Remember a failed dataset load instead of retrying on the next query
    #[arg(long = "cache-failures", global = true)]
    pub cache_failures: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print zone names matching a keyword (case-insensitive substring)
    Search {
        /// Keyword to look for
        query: String,
    },

    /// Show a summary of the loaded index
    Stats,

    /// Read queries from stdin, one keystroke update per line
    Interactive,
}

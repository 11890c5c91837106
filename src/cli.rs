//! Command-line interface definitions for signalboard.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The API key can be provided via a flag or the `NEWS_API_KEY` environment
//! variable.

use clap::Parser;

/// Command-line arguments for the signalboard application.
///
/// # Examples
///
/// ```sh
/// # Render the built-in board once into ./out
/// signalboard -o ./out
///
/// # Custom boards, re-rendered every five minutes
/// signalboard -o ./out -c boards.yaml --interval-secs 300
///
/// # With a news API key
/// NEWS_API_KEY=... signalboard -o ./out
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for rendered HTML pages and JSON snapshots
    #[arg(short, long, default_value = "./out")]
    pub output_dir: String,

    /// Optional path to a YAML board configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// News search API key (without it, boards render from feeds only)
    #[arg(long, env = "NEWS_API_KEY")]
    pub news_api_key: Option<String>,

    /// Re-render every N seconds; 0 renders once and exits
    #[arg(long, default_value_t = 0)]
    pub interval_secs: u64,

    /// Render only the board with this slug
    #[arg(long)]
    pub board: Option<String>,
}

//! # Signalboard
//!
//! A dashboard renderer that aggregates news from a search API and a set of
//! RSS/Atom feeds, shapes the results with watchlist and category rules,
//! and writes static HTML + JSON pages that auto-refresh in the browser.
//! A published-spreadsheet board renders a cleaned table with inferred
//! status/progress/due-date columns and derived metrics.
//!
//! ## Usage
//!
//! ```sh
//! signalboard -o ./out --interval-secs 300
//! ```
//!
//! ## Architecture
//!
//! Each render cycle is a flat pipeline per board:
//! 1. **Fetch**: news API call plus a bounded concurrent pool of feed pulls
//! 2. **Shape**: priority marking, sorting, dedupe, category bucketing
//! 3. **Render**: HTML page and JSON snapshot per board, plus an index page
//!
//! Every source is independently optional: a failed fetch is logged and
//! contributes nothing, and the cycle renders whatever else succeeded.

use chrono::{DateTime, Utc};
use clap::Parser;
use reqwest::Client;
use std::error::Error;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod models;
mod outputs;
mod rank;
mod sheet;
mod sources;
mod utils;

use cli::Cli;
use config::{AppConfig, BoardConfig, SheetConfig};
use models::{BoardSnapshot, SheetSnapshot};
use outputs::{html, json};
use sources::items_or_empty;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("signalboard starting up");

    let args = Cli::parse();
    debug!(?args.output_dir, ?args.config, args.interval_secs, "Parsed CLI arguments");

    let config = AppConfig::load(args.config.as_deref())?;
    if config.boards.is_empty() && config.sheet.is_none() {
        return Err("configuration defines no boards".into());
    }

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    if args.news_api_key.is_none() {
        info!("No news API key set; boards render from feeds only");
    }

    let client = sources::http_client()?;

    loop {
        run_cycle(&client, &config, &args).await;

        if args.interval_secs == 0 {
            break;
        }
        info!(secs = args.interval_secs, "Sleeping until next render cycle");
        sleep(std::time::Duration::from_secs(args.interval_secs)).await;
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    Ok(())
}

/// One full render cycle: every configured board, then the index page.
///
/// Output failures are logged per page and never abort the cycle; the next
/// interval gets a fresh attempt.
#[instrument(level = "info", skip_all)]
async fn run_cycle(client: &Client, config: &AppConfig, args: &Cli) {
    let cycle_t0 = std::time::Instant::now();
    let now = Utc::now();
    let mut index_entries: Vec<(String, String, usize)> = Vec::new();

    for board in &config.boards {
        if let Some(ref only) = args.board {
            if *only != board.slug {
                continue;
            }
        }

        let snapshot = build_board(client, board, args.news_api_key.as_deref(), now).await;
        info!(
            board = %snapshot.slug,
            items = snapshot.item_count(),
            "Board assembled"
        );

        let page = html::render_board(&snapshot, args.interval_secs);
        if let Err(e) = html::write_page(&args.output_dir, &snapshot.slug, &page).await {
            error!(board = %snapshot.slug, error = %e, "Failed to write board HTML");
        }
        if let Err(e) = json::write_snapshot(&args.output_dir, &snapshot.slug, &snapshot).await {
            error!(board = %snapshot.slug, error = %e, "Failed to write board JSON");
        }

        index_entries.push((
            snapshot.slug.clone(),
            snapshot.title.clone(),
            snapshot.item_count(),
        ));
    }

    if let Some(ref sheet_config) = config.sheet {
        let skip = args
            .board
            .as_ref()
            .is_some_and(|only| *only != sheet_config.slug);
        if !skip {
            match build_sheet(client, sheet_config, now).await {
                Ok(snapshot) => {
                    let page = html::render_sheet(&snapshot, args.interval_secs);
                    if let Err(e) = html::write_page(&args.output_dir, &snapshot.slug, &page).await
                    {
                        error!(board = %snapshot.slug, error = %e, "Failed to write sheet HTML");
                    }
                    if let Err(e) =
                        json::write_snapshot(&args.output_dir, &snapshot.slug, &snapshot).await
                    {
                        error!(board = %snapshot.slug, error = %e, "Failed to write sheet JSON");
                    }
                    index_entries.push((
                        snapshot.slug.clone(),
                        snapshot.title.clone(),
                        snapshot.metrics.total_rows,
                    ));
                }
                Err(e) => {
                    // Previous page (if any) stays in place until a cycle succeeds
                    warn!(board = %sheet_config.slug, error = %e, "Sheet fetch failed; skipping page this cycle");
                }
            }
        }
    }

    let index = html::render_index(&index_entries, args.interval_secs);
    if let Err(e) = html::write_page(&args.output_dir, "index", &index).await {
        error!(error = %e, "Failed to write index page");
    }

    info!(
        boards = index_entries.len(),
        elapsed_ms = cycle_t0.elapsed().as_millis() as u64,
        "Render cycle complete"
    );
}

/// Fetch, merge, and shape one news board into a snapshot.
#[instrument(level = "info", skip_all, fields(board = %board.slug))]
async fn build_board(
    client: &Client,
    board: &BoardConfig,
    api_key: Option<&str>,
    now: DateTime<Utc>,
) -> BoardSnapshot {
    let mut items = match api_key {
        Some(key) => items_or_empty(
            "news-api",
            sources::newsapi::fetch(client, key, board, now).await,
        ),
        None => Vec::new(),
    };
    items.extend(sources::rss::fetch_all(client, &board.feeds, now, board.feed_max_age_days).await);
    info!(count = items.len(), "Merged items from all sources");

    let items = rank::drop_stale(items, board.api_max_age_days, now);
    let watchlist = board.normalized_watchlist();
    let mut items = items;
    rank::mark_priority(&mut items, &watchlist);
    rank::sort_items(&mut items);
    let mut items = rank::dedupe(items);
    rank::assign_categories(&mut items, &board.categories, &board.default_category);

    let columns = rank::into_columns(
        &items,
        &board.categories,
        &board.default_category,
        board.column_cap,
    );

    BoardSnapshot {
        slug: board.slug.clone(),
        title: board.title.clone(),
        generated_at: now,
        columns,
    }
}

/// Fetch and clean the sheet board into a snapshot.
async fn build_sheet(
    client: &Client,
    config: &SheetConfig,
    now: DateTime<Utc>,
) -> Result<SheetSnapshot, Box<dyn Error>> {
    let csv = sources::sheet::fetch_csv(client, &config.csv_url).await?;
    let table = sheet::clean_table(sheet::parse_csv(&csv));
    let roles = sheet::infer_roles(&table.headers);
    let metrics = sheet::summarize(&table, roles, now.date_naive());
    info!(
        rows = metrics.total_rows,
        status_col = ?roles.status,
        progress_col = ?roles.progress,
        due_col = ?roles.due,
        "Sheet table cleaned"
    );

    Ok(SheetSnapshot {
        slug: config.slug.clone(),
        title: config.title.clone(),
        generated_at: now,
        table,
        roles,
        metrics,
    })
}

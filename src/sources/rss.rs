//! RSS/Atom feed fetching over a bounded concurrent pool.
//!
//! Each feed is fetched and parsed independently; the pool joins all
//! results before the merge step, order irrelevant. A failed feed
//! contributes an empty list and a warning, nothing more.

use crate::config::FeedConfig;
use crate::models::NewsItem;
use crate::sources::{items_or_empty, MAX_CONCURRENT_FETCHES, MAX_ITEMS_PER_FEED, MIN_TITLE_CHARS};
use crate::utils::strip_html;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::error::Error;
use tracing::{debug, info, instrument};

/// Fetch every feed of a board concurrently and collect the results.
///
/// The pool is capped at [`MAX_CONCURRENT_FETCHES`] in-flight requests.
/// Workers produce disjoint lists that are appended only after completing,
/// so there is no shared mutable state to coordinate.
#[instrument(level = "info", skip_all, fields(feeds = feeds.len()))]
pub async fn fetch_all(
    client: &Client,
    feeds: &[FeedConfig],
    now: DateTime<Utc>,
    max_age_days: i64,
) -> Vec<NewsItem> {
    let items: Vec<NewsItem> = stream::iter(feeds)
        .map(|feed| async move {
            let result = fetch_feed(client, feed, now, max_age_days).await;
            items_or_empty(&feed.name, result)
        })
        .buffer_unordered(MAX_CONCURRENT_FETCHES)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .flatten()
        .collect();

    info!(count = items.len(), "Collected feed items");
    items
}

/// Fetch and parse a single feed.
async fn fetch_feed(
    client: &Client,
    feed: &FeedConfig,
    now: DateTime<Utc>,
    max_age_days: i64,
) -> Result<Vec<NewsItem>, Box<dyn Error>> {
    let bytes = client
        .get(&feed.url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    let parsed = feed_rs::parser::parse(&bytes[..])?;
    let items = items_from_feed(parsed, &feed.name, now, max_age_days);
    debug!(source = %feed.name, count = items.len(), "Parsed feed");
    Ok(items)
}

/// Convert a parsed feed into normalized news items.
///
/// Entries without a link are dropped, titles are stripped of markup, very
/// short titles (section headers, navigation junk) are skipped, and entries
/// older than `max_age_days` are discarded. Entries without any timestamp
/// are kept and dated `now`.
pub fn items_from_feed(
    feed: feed_rs::model::Feed,
    source_name: &str,
    now: DateTime<Utc>,
    max_age_days: i64,
) -> Vec<NewsItem> {
    feed.entries
        .into_iter()
        .take(MAX_ITEMS_PER_FEED)
        .filter_map(|entry| {
            let title = strip_html(&entry.title.map(|t| t.content).unwrap_or_default());
            if title.chars().count() < MIN_TITLE_CHARS {
                return None;
            }
            let link = entry.links.first().map(|l| l.href.clone())?;
            let published = entry.published.or(entry.updated).unwrap_or(now);
            if (now - published).num_days() > max_age_days {
                return None;
            }
            let summary = entry
                .summary
                .map(|s| strip_html(&s.content))
                .or_else(|| entry.content.and_then(|c| c.body).map(|b| strip_html(&b)))
                .filter(|s| !s.is_empty());
            Some(
                NewsItem::new(title, link, source_name.to_string(), published)
                    .with_summary(summary),
            )
        })
        .collect()
}

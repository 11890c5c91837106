//! Data sources contributing news items and sheet rows to each render cycle.
//!
//! # Supported sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | News search API | [`newsapi`] | JSON over HTTP GET | Requires API key; boolean query |
//! | RSS/Atom feeds | [`rss`] | feed-rs parsing | Bounded concurrent pool |
//! | Published sheet | [`sheet`] | CSV export over HTTP GET | Arbitrary header row |
//!
//! # Common patterns
//!
//! Every source is independently optional: a fetch failure is logged as a
//! warning and contributes zero items to the cycle ([`items_or_empty`]).
//! There is no retry and no backoff. All requests share one [`Client`] with
//! a fixed per-request timeout, built by [`http_client`] and passed down
//! explicitly.

use crate::models::NewsItem;
use reqwest::Client;
use std::error::Error;
use std::time::Duration;
use tracing::warn;

pub mod newsapi;
pub mod rss;
pub mod sheet;

/// Browser-like user agent; several feed hosts reject default library UAs.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fixed socket timeout per request. A slow source delays the render cycle
/// at most this long per in-flight request.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Ceiling of the concurrent feed-fetch pool.
pub const MAX_CONCURRENT_FETCHES: usize = 12;

/// Items taken from a single feed before cutoffs apply.
pub const MAX_ITEMS_PER_FEED: usize = 20;

/// Feed titles shorter than this are treated as navigation junk.
pub const MIN_TITLE_CHARS: usize = 30;

/// Build the shared HTTP client used by every source.
pub fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
}

/// Collapse a per-source fetch result into items, logging failures.
///
/// This is the whole error-handling contract for sources: a failed fetch
/// yields an empty list and never propagates to the render cycle.
pub fn items_or_empty(source: &str, result: Result<Vec<NewsItem>, Box<dyn Error>>) -> Vec<NewsItem> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!(source = %source, error = %e, "Source fetch failed; contributing no items");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_items_or_empty_passes_items_through() {
        let items = vec![NewsItem::new(
            "A headline".to_string(),
            "https://example.com/a".to_string(),
            "Example".to_string(),
            Utc::now(),
        )];
        assert_eq!(items_or_empty("Example", Ok(items)).len(), 1);
    }

    #[test]
    fn test_items_or_empty_swallows_errors() {
        let failed: Result<Vec<NewsItem>, Box<dyn std::error::Error>> =
            Err("connection refused".into());
        assert!(items_or_empty("Example", failed).is_empty());
    }
}

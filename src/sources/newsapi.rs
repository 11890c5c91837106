//! News search API client.
//!
//! Fetches recent articles from a NewsAPI-compatible `everything` endpoint
//! using a URL-encoded boolean query built from the board's watchlist and
//! topic terms, with a NOT clause for excluded terms. Without an API key
//! the board simply renders from its feeds alone.

use crate::config::BoardConfig;
use crate::models::NewsItem;
use crate::utils::strip_html;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, info, instrument};

const ENDPOINT: &str = "https://newsapi.org/v2/everything";
const PAGE_SIZE: usize = 20;

/// Watchlist terms beyond this count are dropped from the query to keep the
/// URL under common length limits.
const QUERY_TERM_CAP: usize = 150;

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    source: ArticleSource,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

/// Build the boolean query string for a board.
///
/// Watchlist terms are required-term prefixed (`+astro OR +amdocs ...`),
/// multi-word topics are quoted, and excluded terms go into one trailing
/// NOT group. The output is the raw query; URL encoding happens in
/// [`fetch`].
pub fn build_query(board: &BoardConfig) -> String {
    let mut parts: Vec<String> = board
        .normalized_watchlist()
        .into_iter()
        .take(QUERY_TERM_CAP)
        .map(|term| format!("+{}", quote_term(&term)))
        .collect();

    if !board.topics.is_empty() {
        let topics = board
            .topics
            .iter()
            .map(|t| quote_term(t))
            .collect::<Vec<_>>()
            .join(" OR ");
        parts.push(format!("({})", topics));
    }

    let mut query = format!("({})", parts.join(" OR "));

    if !board.exclude.is_empty() {
        let excluded = board
            .exclude
            .iter()
            .map(|t| quote_term(t))
            .collect::<Vec<_>>()
            .join(" OR ");
        query.push_str(&format!(" NOT ({})", excluded));
    }

    query
}

fn quote_term(term: &str) -> String {
    if term.contains(' ') {
        format!("\"{}\"", term)
    } else {
        term.to_string()
    }
}

/// Fetch recent articles for a board.
///
/// # Errors
///
/// Returns an error on network failure, a non-2xx response, a payload that
/// fails to parse, or an API-level error status. Callers route the result
/// through [`crate::sources::items_or_empty`].
#[instrument(level = "info", skip_all, fields(board = %board.slug))]
pub async fn fetch(
    client: &Client,
    api_key: &str,
    board: &BoardConfig,
    now: DateTime<Utc>,
) -> Result<Vec<NewsItem>, Box<dyn Error>> {
    let query = build_query(board);
    debug!(query = %query, "Built news API query");

    let url = format!(
        "{}?q={}&language=en&sortBy=publishedAt&pageSize={}&apiKey={}",
        ENDPOINT,
        urlencoding::encode(&query),
        PAGE_SIZE,
        api_key
    );

    let body = client.get(&url).send().await?.error_for_status()?.text().await?;
    let items = parse_envelope(&body, now, board.api_max_age_days)?;
    info!(count = items.len(), "Fetched news API articles");
    Ok(items)
}

/// Parse an API response body into news items, dropping articles older than
/// `max_age_days` and articles missing a title or link.
pub fn parse_envelope(
    body: &str,
    now: DateTime<Utc>,
    max_age_days: i64,
) -> Result<Vec<NewsItem>, Box<dyn Error>> {
    let envelope: Envelope = serde_json::from_str(body)?;
    if envelope.status != "ok" {
        return Err(envelope
            .message
            .unwrap_or_else(|| format!("API status {}", envelope.status))
            .into());
    }

    let items = envelope
        .articles
        .into_iter()
        .filter_map(|art| {
            let title = strip_html(art.title.as_deref()?);
            let link = art.url?;
            let published = art
                .published_at
                .as_deref()
                .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or(now);
            if (now - published).num_days() > max_age_days {
                return None;
            }
            let source = art.source.name.filter(|n| !n.trim().is_empty());
            let summary = art.description.map(|d| strip_html(&d)).filter(|d| !d.is_empty());
            let mut item = NewsItem::new(title, link, source.unwrap_or_default(), published)
                .with_summary(summary);
            if item.source.is_empty() {
                // Some articles come back with an empty source block; tag
                // them with the link host instead.
                item.source = item.source_tag().unwrap_or_else(|| "news-api".to_string());
            }
            Some(item)
        })
        .collect();

    Ok(items)
}

//! Data models for news items, board snapshots, and sheet tables.
//!
//! This module defines the core data structures used throughout the
//! application:
//! - [`NewsItem`]: a normalized record from any news source
//! - [`BoardSnapshot`] / [`BoardColumn`]: one rendered news board
//! - [`SheetTable`], [`ColumnRoles`], [`SheetMetrics`]: the spreadsheet board
//!
//! Items are immutable once constructed and live only for the duration of a
//! single render cycle; the snapshot types exist so the same data can be
//! written as both HTML and JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A normalized news record from any source (news API or RSS/Atom feed).
///
/// The `category` and `priority` fields are derived during ranking, not
/// fetched: `priority` is set when the title or summary contains a watchlist
/// keyword, and `category` is assigned by the board's ordered rule list.
#[derive(Debug, Clone, Serialize)]
pub struct NewsItem {
    /// Cleaned headline text.
    pub title: String,
    /// Absolute link to the story.
    pub link: String,
    /// Display name of the contributing source.
    pub source: String,
    /// Publication timestamp in UTC.
    pub published: DateTime<Utc>,
    /// Optional cleaned summary text, used for watchlist matching.
    pub summary: Option<String>,
    /// Bucket label assigned by the first matching category rule.
    pub category: Option<String>,
    /// True when a watchlist keyword appears in the title or summary.
    pub priority: bool,
}

impl NewsItem {
    pub fn new(title: String, link: String, source: String, published: DateTime<Utc>) -> Self {
        Self {
            title,
            link,
            source,
            published,
            summary: None,
            category: None,
            priority: false,
        }
    }

    pub fn with_summary(mut self, summary: Option<String>) -> Self {
        self.summary = summary;
        self
    }

    /// Extract the domain name (before .com/.org/etc) from the item link.
    /// For example: "https://www.telecoms.com/5g/article" -> "telecoms"
    pub fn source_tag(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.link).ok()?;
        let host = parsed.host_str()?;
        let parts: Vec<&str> = host.split('.').collect();
        if parts.len() >= 2 {
            // Second-to-last part handles both "cnn.com" and "lite.cnn.com"
            Some(parts[parts.len() - 2].to_string())
        } else {
            None
        }
    }
}

/// One rendered news board: a titled set of category columns plus the
/// timestamp of the render cycle that produced it.
#[derive(Debug, Serialize)]
pub struct BoardSnapshot {
    /// URL-safe identifier, doubles as the output filename stem.
    pub slug: String,
    /// Human-readable board title.
    pub title: String,
    /// When this snapshot was generated.
    pub generated_at: DateTime<Utc>,
    /// Category columns in configured order.
    pub columns: Vec<BoardColumn>,
}

impl BoardSnapshot {
    /// Total items across all columns.
    pub fn item_count(&self) -> usize {
        self.columns.iter().map(|c| c.items.len()).sum()
    }
}

/// A single category column of a news board.
#[derive(Debug, Serialize)]
pub struct BoardColumn {
    pub label: String,
    pub items: Vec<NewsItem>,
}

/// A cleaned tabular result from the spreadsheet source.
///
/// No fixed schema: the header row is whatever the sheet declares, and
/// every data row is padded or truncated to the header width.
#[derive(Debug, Clone, Serialize)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Optionally detected column roles for the sheet board.
///
/// Each role points at a column index when a header matched the role's
/// keyword list; an absent role means the derived metric is omitted.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ColumnRoles {
    pub status: Option<usize>,
    pub progress: Option<usize>,
    pub due: Option<usize>,
}

/// Derived metrics for the sheet board, each present only when the
/// corresponding column role was inferred.
#[derive(Debug, Serialize)]
pub struct SheetMetrics {
    pub total_rows: usize,
    /// Mean of parsed progress values, clamped to [0, 100].
    pub avg_progress: Option<f64>,
    /// Distinct status values with row counts, descending by count.
    pub status_counts: Vec<(String, usize)>,
    /// Rows whose due date is strictly before today.
    pub overdue: Option<usize>,
}

/// One rendered sheet board.
#[derive(Debug, Serialize)]
pub struct SheetSnapshot {
    pub slug: String,
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub table: SheetTable,
    pub roles: ColumnRoles,
    pub metrics: SheetMetrics,
}

//! Utility functions for text cleanup, HTML escaping, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - HTML stripping and entity decoding for feed titles and summaries
//! - Escaping for rendered output
//! - String truncation for card titles
//! - Relative-age formatting for recency badges
//! - File system validation for the output directory

use chrono::{DateTime, Utc};
use scraper::Html;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Strip markup and decode entities from a fragment of HTML.
///
/// Feed summaries and titles frequently arrive wrapped in `<p>`, `<a>`, or
/// inline styling tags. This parses the text as an HTML fragment, collects
/// the text nodes, and collapses whitespace.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(strip_html("<p>5G &amp; beyond</p>"), "5G & beyond");
/// ```
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape text for inclusion in HTML output.
///
/// Everything that ends up in a rendered page (titles, source names, cell
/// values) passes through here exactly once, at render time.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Truncate a string to `max` characters, appending an ellipsis when cut.
///
/// Counts characters, not bytes, so multi-byte titles never split mid-char.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    s.chars().take(max).collect::<String>() + "…"
}

/// Format the age of a timestamp as a compact badge string.
///
/// Items under an hour old render as `"now"`, under a day as whole hours
/// (`"5h"`), and anything older as whole days (`"3d"`).
pub fn relative_age(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - published).num_seconds() as f64 / 3600.0;
    if hours < 1.0 {
        "now".to_string()
    } else if hours < 24.0 {
        format!("{}h", hours as i64)
    } else {
        format!("{}d", (hours / 24.0) as i64)
    }
}

/// CSS class for the recency badge: hot under 3 hours, warm under 12.
pub fn age_class(published: DateTime<Utc>, now: DateTime<Utc>) -> &'static str {
    let hours = (now - published).num_seconds() as f64 / 3600.0;
    if hours < 3.0 {
        "time-hot"
    } else if hours < 12.0 {
        "time-warm"
    } else {
        "time-normal"
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Small sync write via std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_strip_html_tags_and_entities() {
        assert_eq!(strip_html("<p>Hello <b>world</b>!</p>"), "Hello world!");
        assert_eq!(strip_html("5G &amp; fibre rollout"), "5G & fibre rollout");
        assert_eq!(strip_html("plain text"), "plain text");
    }

    #[test]
    fn test_strip_html_collapses_whitespace() {
        assert_eq!(strip_html("<div>  a\n\n  b </div>"), "a b");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">AT&T</a>"#),
            "&lt;a href=&quot;x&quot;&gt;AT&amp;T&lt;/a&gt;"
        );
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc…");
        // character count, not byte count
        assert_eq!(truncate_chars("ééé", 2), "éé…");
    }

    #[test]
    fn test_relative_age() {
        let now = Utc::now();
        assert_eq!(relative_age(now - Duration::minutes(20), now), "now");
        assert_eq!(relative_age(now - Duration::hours(5), now), "5h");
        assert_eq!(relative_age(now - Duration::days(3), now), "3d");
    }

    #[test]
    fn test_age_class_boundaries() {
        let now = Utc::now();
        assert_eq!(age_class(now - Duration::hours(1), now), "time-hot");
        assert_eq!(age_class(now - Duration::hours(6), now), "time-warm");
        assert_eq!(age_class(now - Duration::hours(30), now), "time-normal");
    }
}

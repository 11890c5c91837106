//! Merging, prioritization, and bucketing of fetched news items.
//!
//! These are single-pass, stateless filters over the in-memory item list of
//! one render cycle:
//!
//! - [`mark_priority`]: watchlist keyword match against title and summary
//! - [`sort_items`]: priority flag first, then publication time descending
//! - [`dedupe`]: drop later items sharing a normalized title
//! - [`assign_categories`]: ordered first-match-wins keyword rules
//! - [`into_columns`]: bucket sorted items into capped category columns

use crate::config::CategoryRule;
use crate::models::{BoardColumn, NewsItem};
use chrono::{DateTime, Utc};
use itertools::Itertools;

/// Set the priority flag on every item whose title or summary contains a
/// watchlist keyword as a case-insensitive substring.
///
/// `watchlist` must already be lowercased
/// (see [`crate::config::BoardConfig::normalized_watchlist`]).
pub fn mark_priority(items: &mut [NewsItem], watchlist: &[String]) {
    for item in items.iter_mut() {
        let mut haystack = item.title.to_lowercase();
        if let Some(ref summary) = item.summary {
            haystack.push(' ');
            haystack.push_str(&summary.to_lowercase());
        }
        item.priority = watchlist.iter().any(|kw| haystack.contains(kw));
    }
}

/// Order items by priority flag (true first), then publication time
/// descending. Equal-priority, equal-timestamp items keep their relative
/// order.
pub fn sort_items(items: &mut [NewsItem]) {
    items.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then(b.published.cmp(&a.published))
    });
}

/// Drop items whose normalized title was already seen, keeping the first.
///
/// Run after [`sort_items`] so the surviving copy of a cross-posted story
/// is the priority-flagged or newest one.
pub fn dedupe(items: Vec<NewsItem>) -> Vec<NewsItem> {
    items
        .into_iter()
        .unique_by(|item| normalize_title(&item.title))
        .collect()
}

/// Lowercase alphanumeric form of a title, single-spaced, for dedupe keys.
fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Assign each item to the first category rule whose keyword appears in the
/// lowercased title, or to `default_label` when no rule matches.
pub fn assign_categories(items: &mut [NewsItem], rules: &[CategoryRule], default_label: &str) {
    for item in items.iter_mut() {
        let title = item.title.to_lowercase();
        let label = rules
            .iter()
            .find(|rule| {
                rule.keywords
                    .iter()
                    .any(|kw| title.contains(&kw.to_lowercase()))
            })
            .map(|rule| rule.label.as_str())
            .unwrap_or(default_label);
        item.category = Some(label.to_string());
    }
}

/// Drop items older than `max_age_days` relative to `now`.
pub fn drop_stale(items: Vec<NewsItem>, max_age_days: i64, now: DateTime<Utc>) -> Vec<NewsItem> {
    items
        .into_iter()
        .filter(|item| (now - item.published).num_days() <= max_age_days)
        .collect()
}

/// Bucket categorized items into columns, preserving item order and capping
/// each column at `cap`. Column order follows the rule order, with the
/// default bucket last. Every column is emitted even when empty so the
/// rendered layout stays stable.
pub fn into_columns(
    items: &[NewsItem],
    rules: &[CategoryRule],
    default_label: &str,
    cap: usize,
) -> Vec<BoardColumn> {
    let mut labels: Vec<&str> = rules.iter().map(|r| r.label.as_str()).collect();
    labels.push(default_label);

    labels
        .into_iter()
        .map(|label| BoardColumn {
            label: label.to_string(),
            items: items
                .iter()
                .filter(|item| item.category.as_deref() == Some(label))
                .take(cap)
                .cloned()
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item(title: &str, hours_old: i64) -> NewsItem {
        NewsItem::new(
            title.to_string(),
            format!("https://example.com/{}", title.len()),
            "Example".to_string(),
            Utc::now() - Duration::hours(hours_old),
        )
    }

    fn rules() -> Vec<CategoryRule> {
        vec![
            CategoryRule {
                label: "Telco".to_string(),
                keywords: vec!["telecom".into(), "5g".into()],
            },
            CategoryRule {
                label: "Streaming".to_string(),
                keywords: vec!["ott".into(), "streaming".into()],
            },
        ]
    }

    #[test]
    fn test_priority_sorts_before_recency() {
        let mut items = vec![item("fresh but ordinary", 1), item("old but watched", 200)];
        items[1].priority = true;
        sort_items(&mut items);
        // Priority wins regardless of timestamp
        assert_eq!(items[0].title, "old but watched");
    }

    #[test]
    fn test_newer_first_within_equal_priority() {
        let mut items = vec![item("older", 10), item("newer", 2), item("oldest", 20)];
        sort_items(&mut items);
        assert_eq!(items[0].title, "newer");
        assert_eq!(items[1].title, "older");
        assert_eq!(items[2].title, "oldest");
    }

    #[test]
    fn test_no_keyword_never_priority() {
        let watchlist = vec!["amdocs".to_string(), "netcracker".to_string()];
        let mut items = vec![item("Quarterly results for a grocery chain", 1)];
        mark_priority(&mut items, &watchlist);
        assert!(!items[0].priority);
    }

    #[test]
    fn test_priority_match_case_insensitive_title_and_summary() {
        let watchlist = vec!["amdocs".to_string()];
        let mut items = vec![
            item("AMDOCS wins billing contract", 1),
            item("Operator modernizes stack", 1).with_summary(Some(
                "The deal was led by Amdocs engineers".to_string(),
            )),
            item("Unrelated headline", 1),
        ];
        mark_priority(&mut items, &watchlist);
        assert!(items[0].priority);
        assert!(items[1].priority);
        assert!(!items[2].priority);
    }

    #[test]
    fn test_category_first_match_wins() {
        // Title matches both rule sets; the earlier rule must win.
        let mut items = vec![item("Telecom giant launches streaming service", 1)];
        assign_categories(&mut items, &rules(), "Other");
        assert_eq!(items[0].category.as_deref(), Some("Telco"));
    }

    #[test]
    fn test_category_default_bucket() {
        let mut items = vec![item("Completely unrelated robotics story", 1)];
        assign_categories(&mut items, &rules(), "Other");
        assert_eq!(items[0].category.as_deref(), Some("Other"));
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let mut a = item("Nokia & Ericsson sign 5G pact", 1);
        a.priority = true;
        let b = item("Nokia  & Ericsson sign 5G pact!", 5);
        let deduped = dedupe(vec![a, b]);
        assert_eq!(deduped.len(), 1);
        assert!(deduped[0].priority);
    }

    #[test]
    fn test_dedupe_distinct_titles_survive() {
        let deduped = dedupe(vec![item("First story", 1), item("Second story", 1)]);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn test_drop_stale() {
        let now = Utc::now();
        let items = vec![item("recent", 24), item("ancient", 24 * 40)];
        let kept = drop_stale(items, 14, now);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "recent");
    }

    #[test]
    fn test_into_columns_order_and_cap() {
        let mut items: Vec<NewsItem> = (0..15)
            .map(|i| item(&format!("telecom story number {}", i), i))
            .collect();
        items.push(item("streaming platform expands", 1));
        items.push(item("robotics misc", 1));
        assign_categories(&mut items, &rules(), "Other");

        let columns = into_columns(&items, &rules(), "Other", 12);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].label, "Telco");
        assert_eq!(columns[0].items.len(), 12); // capped from 15
        assert_eq!(columns[1].label, "Streaming");
        assert_eq!(columns[1].items.len(), 1);
        assert_eq!(columns[2].label, "Other");
        assert_eq!(columns[2].items.len(), 1);
    }

    #[test]
    fn test_into_columns_emits_empty_columns() {
        let items: Vec<NewsItem> = vec![];
        let columns = into_columns(&items, &rules(), "Other", 12);
        assert_eq!(columns.len(), 3);
        assert!(columns.iter().all(|c| c.items.is_empty()));
    }
}

//! Dashboard configuration: boards, feed registries, watchlists, rules.
//!
//! Everything a board needs lives here as plain data: the feed registry,
//! the watchlist of client and competitor names, and the ordered category
//! rules. A config file is optional; [`AppConfig::default_config`] is the
//! telecom/OTT intelligence board the tool ships with.
//!
//! Category assignment is an ordered list of [`CategoryRule`]s evaluated in
//! sequence; the first rule whose keyword matches the lowercased title wins,
//! and unmatched items fall into `default_category`.

use serde::Deserialize;
use std::error::Error;
use tracing::info;

/// Top-level configuration: any number of news boards plus an optional
/// spreadsheet board.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub boards: Vec<BoardConfig>,
    #[serde(default)]
    pub sheet: Option<SheetConfig>,
}

/// One news board: its sources and its data-shaping rules.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    /// URL-safe identifier; also the output filename stem.
    pub slug: String,
    /// Page title.
    pub title: String,
    /// Topic terms OR-ed into the news API query alongside the watchlist.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Terms excluded from the news API query via a NOT clause.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// RSS/Atom feeds contributing to this board.
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
    /// Keywords that mark an item as priority (case-insensitive substring).
    #[serde(default)]
    pub watchlist: Vec<String>,
    /// Ordered category rules; first match wins.
    #[serde(default)]
    pub categories: Vec<CategoryRule>,
    /// Bucket for items no rule matched.
    #[serde(default = "default_category_label")]
    pub default_category: String,
    /// Maximum items rendered per category column.
    #[serde(default = "default_column_cap")]
    pub column_cap: usize,
    /// Feed items older than this many days are dropped.
    #[serde(default = "default_feed_max_age_days")]
    pub feed_max_age_days: i64,
    /// News API items older than this many days are dropped.
    #[serde(default = "default_api_max_age_days")]
    pub api_max_age_days: i64,
}

impl BoardConfig {
    /// Watchlist lowered and deduplicated, ready for substring matching.
    pub fn normalized_watchlist(&self) -> Vec<String> {
        let mut terms: Vec<String> = self
            .watchlist
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        terms.sort();
        terms.dedup();
        terms
    }
}

/// A single RSS/Atom feed entry in a board's registry.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
}

/// One ordered category rule: items whose lowercased title contains any of
/// `keywords` are assigned `label`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRule {
    pub label: String,
    pub keywords: Vec<String>,
}

/// The spreadsheet board: a published CSV export of a public sheet.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetConfig {
    pub slug: String,
    pub title: String,
    pub csv_url: String,
}

fn default_category_label() -> String {
    "Tech Watch".to_string()
}

fn default_column_cap() -> usize {
    12
}

fn default_feed_max_age_days() -> i64 {
    14
}

fn default_api_max_age_days() -> i64 {
    30
}

impl AppConfig {
    /// Load configuration from a YAML file, or fall back to the built-in
    /// default board when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)?;
                let config: AppConfig = serde_yaml::from_str(&raw)?;
                info!(path = %p, boards = config.boards.len(), "Loaded configuration");
                Ok(config)
            }
            None => {
                info!("No config file given; using built-in default board");
                Ok(Self::default_config())
            }
        }
    }

    /// The built-in telecom/OTT competitive intelligence board.
    pub fn default_config() -> Self {
        let watchlist = [
            // Streaming / broadcast clients
            "astro", "sooka", "njoi", "mongoltv", "fox sports", "fox corporation",
            "at&t", "directv", "nba", "shahid", "mbc group", "tv asahi", "media prima",
            "abs-cbn", "rakuten viki", "trt", "sinclair broadcast", "bally sports",
            "fanduel", "marquee sports", "sony pictures", "sonyliv", "aha video",
            "bbc iplayer", "sky nz", "sky uk", "sky italia", "cignal", "etv network",
            "simple tv", "telekom malaysia", "unifi tv", "britbox", "quickplay",
            // BSS/OSS competitors
            "netcracker", "amdocs", "csg systems", "oracle communications", "ericsson",
            "nokia", "huawei", "comarch", "tecnotree", "matrixx", "optiva",
            "cerillion", "asiainfo", "hansen technologies", "openet", "zte",
            "mavenir", "tech mahindra", "comviva",
        ];

        AppConfig {
            boards: vec![BoardConfig {
                slug: "telecom".to_string(),
                title: "Global Telecom & OTT Pulse".to_string(),
                topics: vec![
                    "OTT streaming".to_string(),
                    "5G".to_string(),
                    "VoD".to_string(),
                    "telecom".to_string(),
                    "BSS".to_string(),
                    "OSS".to_string(),
                    "billing".to_string(),
                    "churn".to_string(),
                    "subscription management".to_string(),
                ],
                exclude: vec![
                    "crypto".to_string(),
                    "bitcoin".to_string(),
                    "nft".to_string(),
                    "ethereum".to_string(),
                ],
                feeds: vec![
                    feed("Telecoms.com", "https://www.telecoms.com/feed"),
                    feed("Light Reading", "https://www.lightreading.com/rss/simple"),
                    feed("Fierce Telecom", "https://www.fierce-network.com/rss.xml"),
                    feed("RCR Wireless", "https://www.rcrwireless.com/feed"),
                    feed("Mobile World Live", "https://www.mobileworldlive.com/feed/"),
                    feed("Variety", "https://variety.com/feed/"),
                    feed("Digital TV Europe", "https://www.digitaltveurope.com/feed/"),
                    feed("TechCrunch", "https://techcrunch.com/feed/"),
                    feed("The Verge", "https://www.theverge.com/rss/index.xml"),
                ],
                watchlist: watchlist.iter().map(|s| s.to_string()).collect(),
                categories: vec![
                    CategoryRule {
                        label: "Telco OSS/BSS".to_string(),
                        keywords: ["telecom", "5g", "bss", "oss", "netcracker", "amdocs"]
                            .iter()
                            .map(|s| s.to_string())
                            .collect(),
                    },
                    CategoryRule {
                        label: "OTT & Streaming".to_string(),
                        keywords: ["ott", "streaming", "vod", "sony"]
                            .iter()
                            .map(|s| s.to_string())
                            .collect(),
                    },
                ],
                default_category: default_category_label(),
                column_cap: default_column_cap(),
                feed_max_age_days: default_feed_max_age_days(),
                api_max_age_days: default_api_max_age_days(),
            }],
            sheet: None,
        }
    }
}

fn feed(name: &str, url: &str) -> FeedConfig {
    FeedConfig {
        name: name.to_string(),
        url: url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_shape() {
        let config = AppConfig::default_config();
        assert_eq!(config.boards.len(), 1);
        let board = &config.boards[0];
        assert_eq!(board.slug, "telecom");
        assert_eq!(board.feeds.len(), 9);
        assert_eq!(board.column_cap, 12);
        assert_eq!(board.categories.len(), 2);
        assert!(config.sheet.is_none());
    }

    #[test]
    fn test_normalized_watchlist_lowercase_unique() {
        let board = BoardConfig {
            slug: "x".into(),
            title: "X".into(),
            topics: vec![],
            exclude: vec![],
            feeds: vec![],
            watchlist: vec!["Amdocs".into(), "amdocs".into(), "  ZTE ".into(), "".into()],
            categories: vec![],
            default_category: default_category_label(),
            column_cap: 12,
            feed_max_age_days: 14,
            api_max_age_days: 30,
        };
        assert_eq!(board.normalized_watchlist(), vec!["amdocs", "zte"]);
    }

    #[test]
    fn test_yaml_parsing_with_defaults() {
        let yaml = r#"
boards:
  - slug: media
    title: Media Watch
    feeds:
      - name: Variety
        url: https://variety.com/feed/
    watchlist: [netflix, disney]
    categories:
      - label: Streaming
        keywords: [streaming, svod]
sheet:
  slug: delivery
  title: Delivery Tracker
  csv_url: https://example.com/sheet.csv
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        let board = &config.boards[0];
        assert_eq!(board.slug, "media");
        assert_eq!(board.default_category, "Tech Watch");
        assert_eq!(board.column_cap, 12);
        assert_eq!(board.feed_max_age_days, 14);
        assert_eq!(config.sheet.as_ref().unwrap().slug, "delivery");
    }
}

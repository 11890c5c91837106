//! Static HTML rendering: board pages, the sheet page, and the index.
//!
//! Every record maps directly to markup; there is no templating engine,
//! just string building the way the index writer does it. All untrusted
//! text (titles, sources, cell values) is escaped exactly once here.

use crate::models::{BoardSnapshot, SheetSnapshot};
use crate::utils::{age_class, escape_html, relative_age, truncate_chars};
use std::error::Error;
use std::fmt::Write;
use tokio::fs;
use tracing::{info, instrument};

const TITLE_CHAR_CAP: usize = 150;

/// Shared inline stylesheet: card/column layout for news boards, tiles and
/// table for the sheet board, recency badge colors.
const STYLE: &str = r#"
  * { box-sizing: border-box; margin: 0; }
  body { font-family: 'Inter', -apple-system, sans-serif; background: #0a192f; color: #1e293b; padding: 1.5rem; }
  .header { background: #ffffff; border-radius: 14px; padding: 1.2rem 1.8rem; margin-bottom: 1.5rem; border-bottom: 4px solid #1e40af; }
  .header h1 { font-size: 1.7rem; color: #0a192f; }
  .header .meta { color: #64748b; font-size: 0.85rem; margin-top: 0.4rem; }
  .columns { display: flex; gap: 1rem; align-items: flex-start; }
  .column { flex: 1; background: #f8fafc; border-radius: 12px; padding: 0.8rem; }
  .col-header { font-weight: 700; color: #1e40af; padding: 0.3rem 0.4rem 0.7rem; border-bottom: 2px solid #e2e8f0; margin-bottom: 0.6rem; }
  .news-card, .news-card-priority { background: #ffffff; border: 1px solid #e2e8f0; border-radius: 10px; padding: 11px; margin-bottom: 10px; }
  .news-card-priority { border-left: 5px solid #dc2626; background: #fef2f2; }
  .news-title { color: #1e40af; font-size: 0.95rem; font-weight: 600; text-decoration: none; display: block; margin-bottom: 6px; }
  .news-title:hover { text-decoration: underline; }
  .news-meta { font-size: 0.76rem; color: #64748b; }
  .time-hot { color: #dc2626; font-weight: 700; }
  .time-warm { color: #ea580c; font-weight: 600; }
  .time-normal { color: #64748b; }
  .empty { text-align: center; color: #94a3b8; padding: 34px 6px; font-size: 0.85rem; }
  .tiles { display: flex; gap: 1rem; margin-bottom: 1.5rem; }
  .tile { flex: 1; background: #ffffff; border-radius: 12px; padding: 1rem 1.2rem; }
  .tile .label { color: #64748b; font-size: 0.78rem; text-transform: uppercase; }
  .tile .value { color: #0a192f; font-size: 1.6rem; font-weight: 800; margin-top: 0.3rem; }
  .bar { background: #e2e8f0; border-radius: 6px; height: 10px; margin-top: 0.5rem; overflow: hidden; }
  .bar > div { background: #1e40af; height: 100%; }
  table { width: 100%; border-collapse: collapse; background: #ffffff; border-radius: 12px; overflow: hidden; }
  th { background: #1e40af; color: #ffffff; text-align: left; padding: 9px 12px; font-size: 0.82rem; }
  td { padding: 8px 12px; border-bottom: 1px solid #e2e8f0; font-size: 0.86rem; }
  .index-link { display: block; background: #ffffff; border-radius: 12px; padding: 1rem 1.4rem; margin-bottom: 0.8rem; color: #1e40af; font-weight: 700; text-decoration: none; }
  .index-link small { color: #64748b; font-weight: 400; margin-left: 0.6rem; }
"#;

fn page_shell(title: &str, refresh_secs: u64, body: &str) -> String {
    let mut head = String::new();
    if refresh_secs > 0 {
        let _ = writeln!(head, r#"  <meta http-equiv="refresh" content="{}">"#, refresh_secs);
    }
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n{}  \
         <title>{}</title>\n  <style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        head,
        escape_html(title),
        STYLE,
        body
    )
}

/// Render a news board as column-of-cards HTML.
pub fn render_board(snapshot: &BoardSnapshot, refresh_secs: u64) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<div class=\"header\">\n  <h1>{}</h1>\n  <div class=\"meta\">{} signals · generated {} UTC</div>\n</div>",
        escape_html(&snapshot.title),
        snapshot.item_count(),
        snapshot.generated_at.format("%Y-%m-%d %H:%M")
    );

    body.push_str("<div class=\"columns\">\n");
    for column in &snapshot.columns {
        let _ = writeln!(
            body,
            "<div class=\"column\">\n<div class=\"col-header\">{}</div>",
            escape_html(&column.label)
        );

        if column.items.is_empty() {
            body.push_str("<div class=\"empty\">No recent signals</div>\n");
        }

        for item in &column.items {
            let card_class = if item.priority {
                "news-card-priority"
            } else {
                "news-card"
            };
            let _ = writeln!(
                body,
                "<div class=\"{}\">\n  <a class=\"news-title\" href=\"{}\" target=\"_blank\">{}</a>\n  \
                 <div class=\"news-meta\"><span class=\"{}\">{}</span> · {}</div>\n</div>",
                card_class,
                escape_html(&item.link),
                escape_html(&truncate_chars(&item.title, TITLE_CHAR_CAP)),
                age_class(item.published, snapshot.generated_at),
                relative_age(item.published, snapshot.generated_at),
                escape_html(&item.source),
            );
        }
        body.push_str("</div>\n");
    }
    body.push_str("</div>\n");

    page_shell(&snapshot.title, refresh_secs, &body)
}

/// Render the sheet board: metric tiles, then the cleaned table.
///
/// Progress cells render as bars when the progress role was inferred;
/// metrics with no inferred role are simply absent from the page.
pub fn render_sheet(snapshot: &SheetSnapshot, refresh_secs: u64) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<div class=\"header\">\n  <h1>{}</h1>\n  <div class=\"meta\">{} rows · generated {} UTC</div>\n</div>",
        escape_html(&snapshot.title),
        snapshot.metrics.total_rows,
        snapshot.generated_at.format("%Y-%m-%d %H:%M")
    );

    body.push_str("<div class=\"tiles\">\n");
    let _ = writeln!(
        body,
        "<div class=\"tile\"><div class=\"label\">Items</div><div class=\"value\">{}</div></div>",
        snapshot.metrics.total_rows
    );
    if let Some(avg) = snapshot.metrics.avg_progress {
        let _ = writeln!(
            body,
            "<div class=\"tile\"><div class=\"label\">Avg progress</div><div class=\"value\">{:.0}%</div>\
             <div class=\"bar\"><div style=\"width:{:.0}%\"></div></div></div>",
            avg, avg
        );
    }
    if let Some(overdue) = snapshot.metrics.overdue {
        let _ = writeln!(
            body,
            "<div class=\"tile\"><div class=\"label\">Overdue</div><div class=\"value\">{}</div></div>",
            overdue
        );
    }
    for (status, count) in snapshot.metrics.status_counts.iter().take(3) {
        let _ = writeln!(
            body,
            "<div class=\"tile\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
            escape_html(status),
            count
        );
    }
    body.push_str("</div>\n");

    body.push_str("<table>\n<tr>");
    for header in &snapshot.table.headers {
        let _ = write!(body, "<th>{}</th>", escape_html(header));
    }
    body.push_str("</tr>\n");
    for row in &snapshot.table.rows {
        body.push_str("<tr>");
        for (i, cell) in row.iter().enumerate() {
            if snapshot.roles.progress == Some(i) {
                match crate::sheet::parse_percent(cell) {
                    Some(pct) => {
                        let _ = write!(
                            body,
                            "<td>{:.0}%<div class=\"bar\"><div style=\"width:{:.0}%\"></div></div></td>",
                            pct, pct
                        );
                    }
                    None => {
                        let _ = write!(body, "<td>{}</td>", escape_html(cell));
                    }
                }
            } else {
                let _ = write!(body, "<td>{}</td>", escape_html(cell));
            }
        }
        body.push_str("</tr>\n");
    }
    body.push_str("</table>\n");

    page_shell(&snapshot.title, refresh_secs, &body)
}

/// Render the index page: one link per board with its item count.
pub fn render_index(entries: &[(String, String, usize)], refresh_secs: u64) -> String {
    let mut body = String::new();
    body.push_str("<div class=\"header\">\n  <h1>Signalboard</h1>\n</div>\n");
    for (slug, title, count) in entries {
        let _ = writeln!(
            body,
            "<a class=\"index-link\" href=\"./{}.html\">{}<small>{} items</small></a>",
            escape_html(slug),
            escape_html(title),
            count
        );
    }
    page_shell("Signalboard", refresh_secs, &body)
}

/// Write a rendered page to `{out_dir}/{slug}.html`.
#[instrument(level = "info", skip_all, fields(%slug))]
pub async fn write_page(out_dir: &str, slug: &str, html: &str) -> Result<(), Box<dyn Error>> {
    let path = format!("{}/{}.html", out_dir.trim_end_matches('/'), slug);
    fs::write(&path, html).await?;
    info!(path = %path, "Wrote HTML page");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoardColumn, ColumnRoles, NewsItem, SheetMetrics, SheetTable};
    use chrono::{Duration, Utc};

    fn snapshot() -> BoardSnapshot {
        let now = Utc::now();
        let mut hot = NewsItem::new(
            "AT&T <renews> billing pact".to_string(),
            "https://example.com/a?x=1&y=2".to_string(),
            "Example Wire".to_string(),
            now - Duration::hours(1),
        );
        hot.priority = true;
        let cold = NewsItem::new(
            "Ordinary infrastructure update".to_string(),
            "https://example.com/b".to_string(),
            "Example Wire".to_string(),
            now - Duration::days(2),
        );
        BoardSnapshot {
            slug: "telecom".to_string(),
            title: "Telecom & OTT".to_string(),
            generated_at: now,
            columns: vec![
                BoardColumn {
                    label: "Telco".to_string(),
                    items: vec![hot, cold],
                },
                BoardColumn {
                    label: "Streaming".to_string(),
                    items: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_render_board_escapes_and_classes() {
        let html = render_board(&snapshot(), 300);
        assert!(html.contains("AT&amp;T &lt;renews&gt; billing pact"));
        assert!(html.contains("news-card-priority"));
        assert!(html.contains("time-hot"));
        assert!(html.contains("time-normal"));
        assert!(html.contains("Telecom &amp; OTT"));
        assert!(html.contains(r#"<meta http-equiv="refresh" content="300">"#));
    }

    #[test]
    fn test_render_board_empty_column_placeholder() {
        let html = render_board(&snapshot(), 0);
        assert!(html.contains("No recent signals"));
        assert!(!html.contains("http-equiv"));
    }

    #[test]
    fn test_render_sheet_progress_bars_and_tiles() {
        let sheet = SheetSnapshot {
            slug: "delivery".to_string(),
            title: "Delivery Tracker".to_string(),
            generated_at: Utc::now(),
            table: SheetTable {
                headers: vec!["Task".to_string(), "Progress %".to_string()],
                rows: vec![
                    vec!["Ship <beta>".to_string(), "40%".to_string()],
                    vec!["Docs".to_string(), "80%".to_string()],
                ],
            },
            roles: ColumnRoles {
                status: None,
                progress: Some(1),
                due: None,
            },
            metrics: SheetMetrics {
                total_rows: 2,
                avg_progress: Some(60.0),
                status_counts: vec![],
                overdue: None,
            },
        };
        let html = render_sheet(&sheet, 0);
        assert!(html.contains("Ship &lt;beta&gt;"));
        assert!(html.contains("width:40%"));
        assert!(html.contains(">60%<"));
        // No due role inferred, no overdue tile
        assert!(!html.contains("Overdue"));
    }

    #[test]
    fn test_render_index_links() {
        let html = render_index(
            &[("telecom".to_string(), "Telecom & OTT".to_string(), 24)],
            300,
        );
        assert!(html.contains("href=\"./telecom.html\""));
        assert!(html.contains("Telecom &amp; OTT"));
        assert!(html.contains("24 items"));
    }
}

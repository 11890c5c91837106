//! Spreadsheet table cleaning, column-role inference, and derived metrics.
//!
//! The sheet board reads a published CSV export with an arbitrary header
//! row. There is no fixed schema; instead three column roles are optionally
//! inferred from normalized header names:
//!
//! - **status**: headers containing `status`, `state`, or `stage`
//! - **progress**: headers containing `progress`, `complete`, `done`, or `%`
//! - **due-date**: headers containing `due`, `deadline`, `target`, or `eta`
//!
//! The first column matching a role's keyword list wins that role. A role
//! with no matching column simply omits its derived metric.

use crate::models::{ColumnRoles, SheetMetrics, SheetTable};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::mem::take;

const STATUS_HINTS: &[&str] = &["status", "state", "stage"];
const PROGRESS_HINTS: &[&str] = &["progress", "complete", "completion", "done", "%"];
const DUE_HINTS: &[&str] = &["due", "deadline", "target", "eta"];

static PERCENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("percent regex"));

/// Minimal CSV parser, quote and CRLF tolerant.
///
/// Handles RFC 4180 double-quote escaping; unterminated quotes flush the
/// trailing field rather than erroring, since published sheet exports are
/// occasionally sloppy.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush any trailing field/row even if quotes were unterminated.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Build a cleaned [`SheetTable`] from raw CSV rows.
///
/// The first row becomes the header; data rows are trimmed, fully-empty
/// rows are dropped, and every row is padded or truncated to the header
/// width. Trailing columns with an empty header and no values (a common
/// export artifact) are removed.
pub fn clean_table(raw: Vec<Vec<String>>) -> SheetTable {
    let mut raw = raw.into_iter();
    let headers: Vec<String> = raw
        .next()
        .unwrap_or_default()
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();
    let width = headers.len();

    let mut rows: Vec<Vec<String>> = raw
        .map(|row| {
            let mut cells: Vec<String> = row.into_iter().map(|c| c.trim().to_string()).collect();
            cells.resize(width, String::new());
            cells.truncate(width);
            cells
        })
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect();

    let mut headers = headers;
    while let Some(last) = headers.last() {
        let idx = headers.len() - 1;
        if last.is_empty() && rows.iter().all(|r| r[idx].is_empty()) {
            headers.pop();
            for row in &mut rows {
                row.pop();
            }
        } else {
            break;
        }
    }

    SheetTable { headers, rows }
}

/// Normalize a header name for role matching: lowercase, with runs of
/// non-alphanumeric characters (except `%`) collapsed to single spaces.
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '%' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Infer column roles from the header row.
///
/// For each role, the first column whose normalized header contains any of
/// the role's keywords wins; later matches are ignored. A column can carry
/// more than one role only if its header matches multiple keyword lists.
pub fn infer_roles(headers: &[String]) -> ColumnRoles {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    let first_match = |hints: &[&str]| {
        normalized
            .iter()
            .position(|h| hints.iter().any(|hint| h.contains(hint)))
    };

    ColumnRoles {
        status: first_match(STATUS_HINTS),
        progress: first_match(PROGRESS_HINTS),
        due: first_match(DUE_HINTS),
    }
}

/// Parse a progress cell like `85%`, `85.5 %`, or `85` into a percentage
/// clamped to [0, 100]. Returns `None` when the cell holds no number.
pub fn parse_percent(cell: &str) -> Option<f64> {
    let m = PERCENT_RE.find(cell)?;
    let value: f64 = m.as_str().parse().ok()?;
    Some(value.clamp(0.0, 100.0))
}

/// Parse a due-date cell in any of the formats sheets commonly hold.
pub fn parse_due(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%d %b %Y", "%b %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(cell, fmt) {
            return Some(date);
        }
    }
    None
}

/// Derive metrics from a cleaned table. Each metric is present only when
/// its column role was inferred; rows whose cell fails to parse contribute
/// nothing to that metric.
pub fn summarize(table: &SheetTable, roles: ColumnRoles, today: NaiveDate) -> SheetMetrics {
    let avg_progress = roles.progress.map(|col| {
        let values: Vec<f64> = table
            .rows
            .iter()
            .filter_map(|row| parse_percent(&row[col]))
            .collect();
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    });

    let status_counts = match roles.status {
        Some(col) => {
            let mut counts: HashMap<String, usize> = HashMap::new();
            for row in &table.rows {
                let value = row[col].trim();
                if !value.is_empty() {
                    *counts.entry(value.to_string()).or_insert(0) += 1;
                }
            }
            let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
            counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
            counts
        }
        None => Vec::new(),
    };

    let overdue = roles.due.map(|col| {
        table
            .rows
            .iter()
            .filter_map(|row| parse_due(&row[col]))
            .filter(|due| *due < today)
            .count()
    });

    SheetMetrics {
        total_rows: table.rows.len(),
        avg_progress,
        status_counts,
        overdue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> SheetTable {
        clean_table(parse_csv(csv))
    }

    #[test]
    fn test_parse_csv_quotes_and_crlf() {
        let rows = parse_csv("a,\"b,c\",d\r\n\"say \"\"hi\"\"\",2,3\n");
        assert_eq!(rows[0], vec!["a", "b,c", "d"]);
        assert_eq!(rows[1], vec!["say \"hi\"", "2", "3"]);
    }

    #[test]
    fn test_parse_csv_skips_blank_lines() {
        let rows = parse_csv("a,b\n\n1,2\n");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_clean_table_pads_and_drops_empty_rows() {
        let t = table("Task,Status,Progress %\nShip beta,Active\n , , \nDocs,Done,100%\n");
        assert_eq!(t.headers.len(), 3);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0], vec!["Ship beta", "Active", ""]);
    }

    #[test]
    fn test_clean_table_trims_trailing_empty_columns() {
        let t = table("Task,Status,\nA,Active,\nB,Done,\n");
        assert_eq!(t.headers, vec!["Task", "Status"]);
        assert_eq!(t.rows[0].len(), 2);
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Progress %"), "progress %");
        assert_eq!(normalize_header("Due-Date"), "due date");
        assert_eq!(normalize_header("  STATUS  "), "status");
    }

    #[test]
    fn test_infer_roles_progress_percent_header() {
        let headers = vec![
            "Task".to_string(),
            "Status".to_string(),
            "Progress %".to_string(),
            "Due Date".to_string(),
        ];
        let roles = infer_roles(&headers);
        assert_eq!(roles.status, Some(1));
        assert_eq!(roles.progress, Some(2));
        assert_eq!(roles.due, Some(3));
    }

    #[test]
    fn test_infer_roles_first_matching_column_wins() {
        let headers = vec![
            "Delivery Status".to_string(),
            "Review Status".to_string(),
        ];
        assert_eq!(infer_roles(&headers).status, Some(0));
    }

    #[test]
    fn test_infer_roles_absent() {
        let headers = vec!["Task".to_string(), "Owner".to_string()];
        let roles = infer_roles(&headers);
        assert!(roles.status.is_none());
        assert!(roles.progress.is_none());
        assert!(roles.due.is_none());
    }

    #[test]
    fn test_parse_percent_clamped() {
        assert_eq!(parse_percent("85%"), Some(85.0));
        assert_eq!(parse_percent("85.5 %"), Some(85.5));
        assert_eq!(parse_percent("150%"), Some(100.0));
        assert_eq!(parse_percent("-20"), Some(0.0));
        assert_eq!(parse_percent("n/a"), None);
    }

    #[test]
    fn test_parse_due_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        assert_eq!(parse_due("2026-03-15"), Some(expected));
        assert_eq!(parse_due("03/15/2026"), Some(expected));
        assert_eq!(parse_due("15 Mar 2026"), Some(expected));
        assert_eq!(parse_due("soon"), None);
    }

    #[test]
    fn test_summarize_metrics() {
        let t = table(
            "Task,Status,Progress %,Due\n\
             A,Active,40%,2026-01-01\n\
             B,Active,60%,2099-01-01\n\
             C,Done,150%,2026-01-02\n\
             D,Blocked,n/a,never\n",
        );
        let roles = infer_roles(&t.headers);
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let metrics = summarize(&t, roles, today);

        assert_eq!(metrics.total_rows, 4);
        // (40 + 60 + clamp(150)=100) / 3
        let avg = metrics.avg_progress.unwrap();
        assert!((avg - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.status_counts[0], ("Active".to_string(), 2));
        assert_eq!(metrics.overdue, Some(2));
    }

    #[test]
    fn test_summarize_omits_metrics_without_roles() {
        let t = table("Task,Owner\nA,Ann\n");
        let roles = infer_roles(&t.headers);
        let metrics = summarize(&t, roles, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
        assert!(metrics.avg_progress.is_none());
        assert!(metrics.overdue.is_none());
        assert!(metrics.status_counts.is_empty());
    }
}

//! JSON snapshot output.
//!
//! Every rendered board also writes its snapshot as JSON next to the HTML
//! page, so other tooling can consume the same data the page shows.

use serde::Serialize;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize a snapshot to `{out_dir}/{slug}.json`.
#[instrument(level = "info", skip_all, fields(%slug))]
pub async fn write_snapshot<T: Serialize>(
    out_dir: &str,
    slug: &str,
    snapshot: &T,
) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string(snapshot)?;
    let path = format!("{}/{}.json", out_dir.trim_end_matches('/'), slug);
    fs::write(&path, json).await?;
    info!(path = %path, "Wrote JSON snapshot");
    Ok(())
}

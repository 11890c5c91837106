//! Published spreadsheet source.
//!
//! Reads a public sheet through its CSV export URL. The response is plain
//! text; all table cleaning and role inference happens in [`crate::sheet`].

use reqwest::Client;
use std::error::Error;
use tracing::{info, instrument};

/// Fetch the CSV export of a published sheet.
#[instrument(level = "info", skip_all, fields(url = %url))]
pub async fn fetch_csv(client: &Client, url: &str) -> Result<String, Box<dyn Error>> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    info!(bytes = body.len(), "Fetched sheet CSV");
    Ok(body)
}

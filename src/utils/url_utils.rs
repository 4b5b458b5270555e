//! URL utilities for screener pagination.

use anyhow::{Context, Result};

/// Build the URL of the screener page starting at `offset`
///
/// Offset `1` is the first page and uses the bare base query. Any other
/// offset is passed through the `r` (first row) parameter.
#[must_use]
pub fn page_url(base_url: &str, offset: usize) -> String {
    if offset == 1 {
        return base_url.to_string();
    }

    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{separator}r={offset}")
}

/// Parse a source URL, rejecting anything that is not http(s)
pub fn parse_source_url(url: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(url).with_context(|| format!("Invalid source URL: {url}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Unsupported scheme '{}' in source URL {url}", parsed.scheme());
    }
    Ok(parsed)
}

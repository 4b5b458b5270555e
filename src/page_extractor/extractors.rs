//! Identifier extraction from rendered screener pages

use anyhow::{Context, Result};
use chromiumoxide::Page;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::js_scripts::link_texts_script;

/// Ticker grammar: one or more uppercase ASCII letters
static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]+$").expect("Invalid identifier regex"));

/// Check whether a link text looks like an identifier
#[must_use]
pub fn is_identifier(text: &str) -> bool {
    IDENTIFIER_PATTERN.is_match(text)
}

/// Reduce raw link texts to the set of identifiers on a page
///
/// Keeps texts matching the identifier grammar and drops `sentinel`.
pub fn extract_identifiers<I, S>(texts: I, sentinel: &str) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .filter_map(|text| {
            let text = text.as_ref().trim();
            (is_identifier(text) && text != sentinel).then(|| text.to_string())
        })
        .collect()
}

/// Evaluate the link-text script in `page` and extract identifiers
pub async fn extract_page_identifiers(
    page: &Page,
    selector: &str,
    sentinel: &str,
) -> Result<HashSet<String>> {
    let script = link_texts_script(selector);
    let texts: Vec<String> = page
        .evaluate(script.as_str())
        .await
        .context("Failed to evaluate link extraction script")?
        .into_value()
        .context("Link extraction script returned an unexpected value")?;

    log::trace!("Extracted {} link texts", texts.len());
    Ok(extract_identifiers(texts, sentinel))
}

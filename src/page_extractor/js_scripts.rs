//! JavaScript evaluation scripts
//!
//! This module contains the JavaScript code evaluated in screener pages.

/// Build the script that returns the trimmed text of every anchor matching `selector`
///
/// The selector is embedded as a JSON string literal so quotes inside it
/// (`a[href*="quote.ashx?t="]`) survive.
#[must_use]
pub fn link_texts_script(selector: &str) -> String {
    let literal = serde_json::to_string(selector).unwrap_or_else(|_| "\"a\"".to_string());
    format!(
        r"
    (() => Array.from(document.querySelectorAll({literal}))
        .map(a => (a.textContent || '').trim())
        .filter(t => t.length > 0))()
"
    )
}

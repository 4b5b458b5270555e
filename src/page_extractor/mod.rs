//! Page data extraction functions.
//!
//! Pulls identifier sets out of rendered screener pages.

// Sub-modules
pub mod extractors;
pub mod js_scripts;

// Re-exports for public API
pub use extractors::{extract_identifiers, extract_page_identifiers, is_identifier};

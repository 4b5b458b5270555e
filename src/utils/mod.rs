pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{page_url, parse_source_url};

//! Image locator and title extraction from page markup.
//!
//! Image locators are matched on the raw markup text rather than through a
//! parsed tree: the site lazy-loads its images, so the paths live in a
//! `data-src` attribute instead of `src`, and a plain text scan finds them
//! regardless of which element or how broken the surrounding markup is.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

static DATA_SRC: Lazy<Regex> = Lazy::new(|| Regex::new(r#"data-src="([^"]+)""#).unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

/// Every `data-src="..."` value in `markup`, in document order.
///
/// Duplicates are kept. Returns an empty vector when nothing matches.
pub fn extract_resources(markup: &str) -> Vec<String> {
    DATA_SRC
        .captures_iter(markup)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Trimmed text of the first `<title>` element, if any.
pub fn extract_title(markup: &str) -> Option<String> {
    let document = Html::parse_document(markup);
    document
        .select(&TITLE)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}

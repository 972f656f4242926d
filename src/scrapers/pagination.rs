//! Page-count discovery.
//!
//! The first page of an article carries pagination links of the form
//! `<a data-page="7">`. The highest number among them is the article's page
//! count. Probing never fails: anything unexpected degrades to one page.

use crate::http::Fetcher;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};

static PAGE_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[data-page]").unwrap());

/// Probes an article's first page for its page count.
#[derive(Debug, Clone)]
pub struct PageCounter<F> {
    fetcher: F,
}

impl<F: Fetcher> PageCounter<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Highest `data-page` value on the page at `url`, at least 1.
    ///
    /// A transport failure yields 1 so the article is still attempted as a
    /// single page. The response status is not inspected: an error page has
    /// no pagination links and also yields 1.
    #[instrument(level = "info", skip(self))]
    pub async fn max_page(&self, url: &str) -> u32 {
        match self.fetcher.get_text(url).await {
            Ok(page) => {
                let max = max_page_in(&page.body);
                debug!(status = %page.status, max, "Resolved page count");
                max
            }
            Err(e) => {
                warn!(error = %e, "Page-count probe failed; assuming a single page");
                1
            }
        }
    }
}

/// Highest numeric `data-page` attribute on an `<a>` element, or 1.
///
/// Values that do not parse as integers are skipped.
pub fn max_page_in(markup: &str) -> u32 {
    let document = Html::parse_document(markup);
    document
        .select(&PAGE_LINK)
        .filter_map(|a| a.value().attr("data-page"))
        .filter_map(|value| value.trim().parse::<u32>().ok())
        .max()
        .unwrap_or(1)
        .max(1)
}

//! Site scraping: from an article id to batches of image downloads.
//!
//! | Module | Role |
//! |--------|------|
//! | [`extract`] | `data-src` locators and `<title>` text from page markup |
//! | [`pagination`] | page count from `a[data-page]` links |
//! | [`article`] | walks one article's pages and dispatches the batches |
//!
//! Pages and articles are processed strictly one after another; the only
//! concurrency is inside a single page's download batch.

pub mod article;
pub mod extract;
pub mod pagination;

//! Data models for articles, pages and download work.
//!
//! - [`ArticleId`]: numeric id of one article, enumerated by the caller
//! - [`PageDescriptor`]: one page of an article and the URL it lives at
//! - [`DownloadTask`]: one image URL paired with the file it is saved to
//! - [`ArticleReport`]: what happened while processing one article

use std::fmt;
use std::path::{Path, PathBuf};

/// File name prefix of every saved image.
pub const IMAGE_PREFIX: &str = "image_";
/// Extension of every saved image, whatever the server actually sends.
pub const IMAGE_EXTENSION: &str = "jpg";

/// Numeric id of one article on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArticleId(pub u64);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ArticleId {
    /// URL of the article's first page, also used for the page-count probe.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/article/{}/", base_url, self.0)
    }

    /// Folder name used when the first page carries no usable title.
    pub fn fallback_folder_name(&self) -> String {
        format!("article_{}", self.0)
    }
}

/// One page of an article. Page numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDescriptor {
    pub article_id: ArticleId,
    pub page_number: u32,
}

impl PageDescriptor {
    pub fn new(article_id: ArticleId, page_number: u32) -> Self {
        Self {
            article_id,
            page_number,
        }
    }

    /// Page 1 is the bare article URL; later pages append `page/{n}/`.
    pub fn url(&self, base_url: &str) -> String {
        let article_url = self.article_id.url(base_url);
        if self.page_number <= 1 {
            article_url
        } else {
            format!("{}page/{}/", article_url, self.page_number)
        }
    }
}

/// One image to fetch and the file it is saved to.
///
/// Destinations are assigned before dispatch, so two tasks of the same
/// article never share a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub url: String,
    pub destination: PathBuf,
}

impl DownloadTask {
    /// Build the task for the image at `index` within an article.
    ///
    /// The locator is appended to the origin as-is; a malformed locator only
    /// shows up later as a failed fetch.
    pub fn for_image(base_url: &str, locator: &str, folder: &Path, index: usize) -> Self {
        Self {
            url: format!("{base_url}{locator}"),
            destination: folder.join(image_file_name(index)),
        }
    }
}

/// `image_{index}.jpg`
pub fn image_file_name(index: usize) -> String {
    format!("{IMAGE_PREFIX}{index}.{IMAGE_EXTENSION}")
}

/// Outcome of one article, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleReport {
    pub article_id: ArticleId,
    pub pages: u32,
    pub pages_failed: u32,
    pub images_queued: usize,
    pub images_saved: usize,
    pub folder: Option<PathBuf>,
}

impl ArticleReport {
    pub fn new(article_id: ArticleId, pages: u32) -> Self {
        Self {
            article_id,
            pages,
            pages_failed: 0,
            images_queued: 0,
            images_saved: 0,
            folder: None,
        }
    }
}

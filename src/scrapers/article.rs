//! Per-article orchestration.
//!
//! For one article the pager:
//! 1. probes the first page for the page count,
//! 2. walks pages 1..=count in order, fetching each page's markup,
//! 3. names and creates the article folder from the first page it fetches,
//! 4. turns the page's image locators into numbered [`DownloadTask`]s and
//!    hands them to the scheduler as one batch.
//!
//! Image numbers start at 0 for every article and continue across pages, so
//! `image_{n}.jpg` follows the order the images appear on the site. A page
//! that cannot be fetched is skipped and contributes no numbers.

use super::extract::{extract_resources, extract_title};
use super::pagination::PageCounter;
use crate::config::Config;
use crate::download::scheduler::DownloadScheduler;
use crate::error::FetchError;
use crate::http::Fetcher;
use crate::models::{ArticleId, ArticleReport, DownloadTask, PageDescriptor};
use crate::utils::{is_usable_folder_name, sanitize_folder_name, truncate_for_log};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Build one page's batch, numbering images from `start_index`.
pub fn plan_batch(
    base_url: &str,
    folder: &Path,
    locators: &[String],
    start_index: usize,
) -> Vec<DownloadTask> {
    locators
        .iter()
        .enumerate()
        .map(|(offset, locator)| {
            DownloadTask::for_image(base_url, locator, folder, start_index + offset)
        })
        .collect()
}

/// Downloads every image of an article into its own numbered folder.
#[derive(Debug, Clone)]
pub struct ArticlePager<F> {
    fetcher: F,
    counter: PageCounter<F>,
    scheduler: DownloadScheduler<F>,
    base_url: String,
    output_dir: PathBuf,
}

impl<F: Fetcher + Clone> ArticlePager<F> {
    pub fn new(fetcher: F, config: &Config) -> Self {
        Self {
            counter: PageCounter::new(fetcher.clone()),
            scheduler: DownloadScheduler::new(
                fetcher.clone(),
                config.concurrency,
                config.show_progress,
            ),
            fetcher,
            base_url: config.base_url.clone(),
            output_dir: config.output_dir.clone(),
        }
    }

    /// Process one article from page-count probe to the last batch.
    ///
    /// Never fails: fetch and filesystem problems are logged and the
    /// affected page is skipped.
    #[instrument(level = "info", skip_all, fields(%article_id))]
    pub async fn process(&self, article_id: ArticleId) -> ArticleReport {
        let max_page = self.counter.max_page(&article_id.url(&self.base_url)).await;
        info!(max_page, "Downloading article");

        let mut report = ArticleReport::new(article_id, max_page);
        let mut next_index = 0usize;

        for page_number in 1..=max_page {
            let page = PageDescriptor::new(article_id, page_number);
            let url = page.url(&self.base_url);
            info!(page = page_number, max_page, %url, "Downloading page");

            let markup = match self.fetch_page(&url).await {
                Ok(markup) => markup,
                Err(e) => {
                    warn!(page = page_number, error = %e, "Page fetch failed; skipping page");
                    report.pages_failed += 1;
                    continue;
                }
            };

            let locators = extract_resources(&markup);
            if locators.is_empty() {
                debug!(page = page_number, markup = %truncate_for_log(&markup, 200), "No images on page");
            }

            let start_index = next_index;
            next_index += locators.len();

            let folder = match &report.folder {
                Some(folder) => folder.clone(),
                None => match self.create_folder(article_id, &markup).await {
                    Ok(folder) => {
                        report.folder = Some(folder.clone());
                        folder
                    }
                    Err(e) => {
                        warn!(page = page_number, error = %e, "Article folder could not be created; skipping page");
                        report.pages_failed += 1;
                        continue;
                    }
                },
            };

            let batch = plan_batch(&self.base_url, &folder, &locators, start_index);
            report.images_queued += batch.len();
            let summary = self.scheduler.run(batch).await;
            report.images_saved += summary.saved;
        }

        info!(
            article_id = %report.article_id,
            pages = report.pages,
            pages_failed = report.pages_failed,
            images_queued = report.images_queued,
            images_saved = report.images_saved,
            "Article complete"
        );
        report
    }

    /// Markup of one page; a non-success status counts as a failed fetch.
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let page = self.fetcher.get_text(url).await?;
        if !page.is_ok() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: page.status,
            });
        }
        Ok(page.body)
    }

    /// Create `{output_dir}/{sanitized title}`, falling back to
    /// `article_{id}` when the page has no usable title or the filesystem
    /// rejects the title as a directory name (too long, reserved, ...).
    async fn create_folder(
        &self,
        article_id: ArticleId,
        markup: &str,
    ) -> Result<PathBuf, FetchError> {
        let titled = extract_title(markup)
            .map(|title| sanitize_folder_name(&title))
            .filter(|name| is_usable_folder_name(name));

        if let Some(name) = titled {
            let folder = self.output_dir.join(name);
            match fs::create_dir_all(&folder).await {
                Ok(()) => {
                    info!(folder = %folder.display(), "Created article folder");
                    return Ok(folder);
                }
                Err(e) => {
                    warn!(folder = %folder.display(), error = %e, "Title cannot name a folder; using article id");
                }
            }
        }

        let folder = self.output_dir.join(article_id.fallback_folder_name());
        fs::create_dir_all(&folder)
            .await
            .map_err(|source| FetchError::filesystem(&folder, source))?;
        info!(folder = %folder.display(), "Created article folder");
        Ok(folder)
    }
}

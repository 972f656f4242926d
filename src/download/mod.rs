//! Image downloading.
//!
//! [`Downloader`] performs a single fetch-and-save for one [`DownloadTask`];
//! [`scheduler::DownloadScheduler`] runs a page's worth of them concurrently.
//! Nothing here returns an error to the caller: every failure is logged where
//! it happens and reported as a [`DownloadOutcome`].

pub mod scheduler;

use crate::error::FetchError;
use crate::http::Fetcher;
use crate::models::DownloadTask;
use reqwest::StatusCode;
use tokio::fs;
use tracing::{debug, warn};

/// Result of one download attempt.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// The body was written to the task's destination.
    Saved { bytes: usize },
    /// The server answered with something other than 200; nothing was written.
    Skipped { status: StatusCode },
    /// The request or the write failed.
    Failed(FetchError),
}

/// Best-effort single-attempt downloader.
#[derive(Debug, Clone)]
pub struct Downloader<F> {
    fetcher: F,
}

impl<F: Fetcher> Downloader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Fetch `task.url` once and write the whole body to `task.destination`
    /// if the server answered 200.
    pub async fn download(&self, task: &DownloadTask) -> DownloadOutcome {
        let fetched = match self.fetcher.get_bytes(&task.url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(url = %task.url, error = %e, "Image download failed");
                return DownloadOutcome::Failed(e);
            }
        };

        if !fetched.is_ok() {
            debug!(url = %task.url, status = %fetched.status, "Image not saved: non-success status");
            return DownloadOutcome::Skipped {
                status: fetched.status,
            };
        }

        let bytes = fetched.body.len();
        match fs::write(&task.destination, &fetched.body).await {
            Ok(()) => {
                debug!(url = %task.url, path = %task.destination.display(), bytes, "Saved image");
                DownloadOutcome::Saved { bytes }
            }
            Err(source) => {
                let e = FetchError::filesystem(&task.destination, source);
                warn!(url = %task.url, error = %e, "Image could not be written");
                DownloadOutcome::Failed(e)
            }
        }
    }
}

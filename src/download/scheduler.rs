//! Bounded-concurrency batch execution.
//!
//! A batch is every [`DownloadTask`] of one page. The scheduler drives at most
//! `ceiling` downloads at a time through `buffer_unordered` and only returns
//! once every task has been attempted, so a batch is a full barrier for the
//! caller. A failing task never cancels its siblings.

use super::{DownloadOutcome, Downloader};
use crate::http::Fetcher;
use crate::models::DownloadTask;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::{info, instrument};

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images {msg}";

/// Aggregate result of one batch, used for logging only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub attempted: usize,
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes: usize,
}

impl BatchSummary {
    fn record(mut self, outcome: &DownloadOutcome) -> Self {
        self.attempted += 1;
        match outcome {
            DownloadOutcome::Saved { bytes } => {
                self.saved += 1;
                self.bytes += bytes;
            }
            DownloadOutcome::Skipped { .. } => self.skipped += 1,
            DownloadOutcome::Failed(_) => self.failed += 1,
        }
        self
    }
}

/// Runs batches of downloads with a fixed ceiling on in-flight requests.
#[derive(Debug, Clone)]
pub struct DownloadScheduler<F> {
    downloader: Downloader<F>,
    ceiling: usize,
    show_progress: bool,
}

impl<F: Fetcher> DownloadScheduler<F> {
    /// A `ceiling` of 0 is treated as 1.
    pub fn new(fetcher: F, ceiling: usize, show_progress: bool) -> Self {
        Self {
            downloader: Downloader::new(fetcher),
            ceiling: ceiling.max(1),
            show_progress,
        }
    }

    /// Attempt every task, at most `ceiling` at once, and wait for all of them.
    #[instrument(level = "info", skip_all, fields(tasks = tasks.len(), ceiling = self.ceiling))]
    pub async fn run(&self, tasks: Vec<DownloadTask>) -> BatchSummary {
        if tasks.is_empty() {
            return BatchSummary::default();
        }

        let t0 = Instant::now();
        let progress = self.progress_bar(tasks.len());
        let downloader = &self.downloader;
        let bar = &progress;

        let summary = stream::iter(tasks)
            .map(|task| async move {
                let outcome = downloader.download(&task).await;
                bar.inc(1);
                outcome
            })
            .buffer_unordered(self.ceiling)
            .fold(BatchSummary::default(), |summary, outcome| async move {
                summary.record(&outcome)
            })
            .await;

        progress.finish_and_clear();
        info!(
            attempted = summary.attempted,
            saved = summary.saved,
            skipped = summary.skipped,
            failed = summary.failed,
            bytes = summary.bytes,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Batch complete"
        );
        summary
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        let bar = ProgressBar::new(len as u64);
        bar.set_style(style);
        bar.set_message("image download progress");
        bar
    }
}

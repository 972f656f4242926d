//! # Paged Image Downloader
//!
//! Downloads the lazy-loaded images of a range of paginated articles into one
//! folder per article, numbering the files `image_0.jpg`, `image_1.jpg`, ...
//! in the order they appear across the article's pages.
//!
//! ## Usage
//!
//! ```sh
//! paged_image_dl --start 14452 --end 14499 -o ./downloads
//! ```
//!
//! ## Architecture
//!
//! The run is a single sequential loop with one concurrent stage:
//! 1. **Probe**: read the article's first page for its page count
//! 2. **Pages**: fetch each page in order and extract its `data-src` images
//! 3. **Batch**: download one page's images concurrently (bounded ceiling)
//! 4. **Next**: carry the image number over to the next page, then the next article
//!
//! Individual failures are logged and skipped; the process exits successfully
//! once the whole range has been attempted.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod download;
mod error;
mod http;
mod models;
mod scrapers;
#[cfg(test)]
mod test_helpers;
mod utils;

use cli::Cli;
use config::Config;
use http::HttpFetcher;
use models::ArticleId;
use scrapers::article::ArticlePager;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("paged_image_dl starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match Config::resolve(&args).await {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    info!(
        base_url = %config.base_url,
        start = config.start,
        end = config.end,
        concurrency = config.concurrency,
        output_dir = %config.output_dir.display(),
        "Configuration resolved"
    );

    if let Err(e) = ensure_writable_dir(&config.output_dir).await {
        error!(error = %e, "Output directory is not writable (fix perms or choose a different path)");
        return Err(e.into());
    }

    let fetcher = HttpFetcher::new(&config)?;
    let pager = ArticlePager::new(fetcher, &config);

    let total = config.article_count();
    for (n, id) in (config.start..=config.end).enumerate() {
        info!(article = n as u64 + 1, total, article_id = id, "Article progress");
        pager.process(ArticleId(id)).await;
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        articles = total,
        "Execution complete"
    );

    Ok(())
}

//! Command-line interface definitions for the paged image downloader.
//!
//! Every option is optional: anything left unset falls back to the YAML
//! config file (if one is given) and then to the built-in defaults in
//! [`crate::config::Config`].

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Default range and origin, images under ./downloads
/// paged_image_dl
///
/// # A single article, 200 downloads in flight
/// paged_image_dl --start 14460 --end 14460 --concurrency 200
///
/// # Settings from a file, output directory overridden
/// paged_image_dl --config ./scrape.yaml -o /srv/images
/// ```
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "PAGED_IMAGE_DL_CONFIG")]
    pub config: Option<PathBuf>,

    /// First article id to download (inclusive)
    #[arg(short, long)]
    pub start: Option<u64>,

    /// Last article id to download (inclusive)
    #[arg(short, long)]
    pub end: Option<u64>,

    /// Site origin used for article pages and image locators
    #[arg(short, long, env = "PAGED_IMAGE_DL_BASE_URL")]
    pub base_url: Option<String>,

    /// Directory that receives one sub-folder per article
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of image downloads in flight at once
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds (no timeout when unset)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Disable the per-page progress bar
    #[arg(long)]
    pub no_progress: bool,
}

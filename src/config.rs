//! Run configuration.
//!
//! A [`Config`] is resolved once at startup from three layers, lowest first:
//! built-in defaults, an optional YAML file, then command-line flags. The
//! resolved value is handed to each component when it is constructed so tests
//! can point everything at a local mock server.
//!
//! # YAML format
//!
//! ```yaml
//! base_url: https://xx.knit.bid
//! start: 14452
//! end: 14499
//! concurrency: 1000
//! output_dir: downloads
//! user_agent: "Mozilla/5.0 ..."
//! timeout_secs: 30
//! headers:
//!   Referer: https://xx.knit.bid/
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://xx.knit.bid";
pub const DEFAULT_START: u64 = 14452;
pub const DEFAULT_END: u64 = 14499;
pub const DEFAULT_CONCURRENCY: usize = 1000;
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Origin without a trailing slash, e.g. `https://xx.knit.bid`.
    pub base_url: String,
    pub start: u64,
    pub end: u64,
    /// Ceiling on simultaneously in-flight image downloads (at least 1).
    pub concurrency: usize,
    pub output_dir: PathBuf,
    pub user_agent: String,
    /// Extra headers sent with every request, next to the User-Agent.
    pub headers: BTreeMap<String, String>,
    pub timeout_secs: Option<u64>,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            start: DEFAULT_START,
            end: DEFAULT_END,
            concurrency: DEFAULT_CONCURRENCY,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: BTreeMap::new(),
            timeout_secs: None,
            show_progress: true,
        }
    }
}

/// The optional YAML layer. Every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub start: Option<u64>,
    pub end: Option<u64>,
    pub concurrency: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub user_agent: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub timeout_secs: Option<u64>,
    pub show_progress: Option<bool>,
}

impl FileConfig {
    pub fn from_yaml(path: &Path, yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let file = Self::from_yaml(path, &yaml)?;
        info!("Loaded config file");
        Ok(file)
    }
}

impl Config {
    /// Resolve the configuration from the command line, reading the YAML
    /// file it names (if any).
    pub async fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path).await?,
            None => FileConfig::default(),
        };
        Self::merge(file, cli)
    }

    /// Layer `file` and then `cli` over the defaults and validate the result.
    pub fn merge(file: FileConfig, cli: &Cli) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let mut headers = file.headers;
        let user_agent = cli
            .user_agent
            .clone()
            .or(file.user_agent)
            .unwrap_or(defaults.user_agent);
        // A User-Agent in the header map would shadow the dedicated setting.
        headers.retain(|name, _| !name.eq_ignore_ascii_case("user-agent"));

        let config = Config {
            base_url: cli
                .base_url
                .clone()
                .or(file.base_url)
                .unwrap_or(defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            start: cli.start.or(file.start).unwrap_or(defaults.start),
            end: cli.end.or(file.end).unwrap_or(defaults.end),
            concurrency: cli
                .concurrency
                .or(file.concurrency)
                .unwrap_or(defaults.concurrency)
                .max(1),
            output_dir: cli
                .output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or(defaults.output_dir),
            user_agent,
            headers,
            timeout_secs: cli.timeout_secs.or(file.timeout_secs),
            show_progress: !cli.no_progress && file.show_progress.unwrap_or(true),
        };
        config.validate()?;
        debug!(?config, "Resolved configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start == 0 || self.start > self.end {
            return Err(ConfigError::Range {
                start: self.start,
                end: self.end,
            });
        }
        Url::parse(&self.base_url).map_err(|source| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        Ok(())
    }

    /// Number of articles in the inclusive id range.
    pub fn article_count(&self) -> u64 {
        self.end - self.start + 1
    }
}

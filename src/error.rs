//! Error types for fetching, downloading and configuration.
//!
//! Fetch-level errors ([`FetchError`]) never escape the pipeline: every
//! component catches them where they occur, logs them and degrades to a
//! smaller result. Only [`ConfigError`] reaches `main`, and only at startup.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// A single failed request or write.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network, DNS, TLS or body-read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered, but not with a success status.
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },

    /// Creating a folder or writing a file failed.
    #[error("filesystem operation on {} failed: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn transport(url: &str, source: reqwest::Error) -> Self {
        FetchError::Transport {
            url: url.to_string(),
            source,
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Errors that stop the program before any article is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid base url {url:?}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid article range {start}..={end}: ids start at 1 and start must not exceed end")]
    Range { start: u64, end: u64 },

    #[error("invalid request header {name:?}: {reason}")]
    Header { name: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("output directory {} is not writable: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

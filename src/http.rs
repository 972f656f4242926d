//! HTTP fetch capability.
//!
//! Components never talk to `reqwest` directly; they are generic over
//! [`Fetcher`] so tests can substitute instrumented stubs. [`HttpFetcher`] is
//! the real implementation: a shared `reqwest::Client` that sends the
//! configured browser-like header set with every request.

use crate::config::Config;
use crate::error::{ConfigError, FetchError};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// A response whose status has not been judged yet.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub status: StatusCode,
    pub body: T,
}

impl<T> Fetched<T> {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }
}

/// One GET per call, no retries.
///
/// `Err` is reserved for transport failures; any status the server answers
/// with comes back inside [`Fetched`] for the caller to interpret.
pub trait Fetcher {
    /// Fetch a page and decode it as text using the response charset.
    async fn get_text(&self, url: &str) -> Result<Fetched<String>, FetchError>;

    /// Fetch a resource as raw bytes.
    async fn get_bytes(&self, url: &str) -> Result<Fetched<Vec<u8>>, FetchError>;
}

/// `reqwest`-backed [`Fetcher`]. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder().default_headers(default_headers(config)?);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ConfigError::Client)?;
        Ok(Self { client })
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e))
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn get_text(&self, url: &str) -> Result<Fetched<String>, FetchError> {
        let t0 = Instant::now();
        let response = self.send(url).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(url, e))?;
        debug!(%status, bytes = body.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "Fetched page");
        Ok(Fetched { status, body })
    }

    #[instrument(level = "debug", skip(self))]
    async fn get_bytes(&self, url: &str) -> Result<Fetched<Vec<u8>>, FetchError> {
        let t0 = Instant::now();
        let response = self.send(url).await?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(url, e))?
            .to_vec();
        debug!(%status, bytes = body.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "Fetched resource");
        Ok(Fetched { status, body })
    }
}

/// Build the header set sent with every request.
pub fn default_headers(config: &Config) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|e| ConfigError::Header {
        name: USER_AGENT.to_string(),
        reason: e.to_string(),
    })?;
    headers.insert(USER_AGENT, user_agent);

    for (name, value) in &config.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::Header {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| ConfigError::Header {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

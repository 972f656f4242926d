//! Shared test helpers: an instrumented in-memory [`Fetcher`] and address helpers.

use crate::error::FetchError;
use crate::http::{Fetched, Fetcher};
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// An origin nothing listens on: bind an ephemeral port, then release it.
pub(crate) fn unreachable_origin() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// A real `reqwest::Error` without touching the network.
pub(crate) fn transport_error(url: &str) -> FetchError {
    let source = reqwest::Client::new()
        .get("::not a url::")
        .build()
        .unwrap_err();
    FetchError::transport(url, source)
}

#[derive(Debug, Clone)]
enum Canned {
    Respond(StatusCode, Vec<u8>),
    Unreachable,
}

#[derive(Debug, Default)]
struct StubState {
    routes: Mutex<HashMap<String, Canned>>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// In-memory fetcher that records every request and the peak number of
/// requests in flight. Unrouted URLs answer 404 with an empty body.
#[derive(Debug, Clone, Default)]
pub(crate) struct StubFetcher {
    state: Arc<StubState>,
    delay: Duration,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Hold every request for `delay` so concurrent requests overlap.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn page(self, url: &str, html: &str) -> Self {
        self.respond(url, 200, html.as_bytes())
    }

    pub(crate) fn respond(self, url: &str, status: u16, body: &[u8]) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Canned::Respond(status, body.to_vec()));
        self
    }

    pub(crate) fn unreachable(self, url: &str) -> Self {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Canned::Unreachable);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.state.peak.load(Ordering::SeqCst)
    }

    async fn serve(&self, url: &str) -> Result<Fetched<Vec<u8>>, FetchError> {
        self.state.requests.lock().unwrap().push(url.to_string());
        let now = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.peak.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let canned = self.state.routes.lock().unwrap().get(url).cloned();
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);

        match canned {
            Some(Canned::Respond(status, body)) => Ok(Fetched { status, body }),
            Some(Canned::Unreachable) => Err(transport_error(url)),
            None => Ok(Fetched {
                status: StatusCode::NOT_FOUND,
                body: Vec::new(),
            }),
        }
    }
}

impl Fetcher for StubFetcher {
    async fn get_text(&self, url: &str) -> Result<Fetched<String>, FetchError> {
        let fetched = self.serve(url).await?;
        Ok(Fetched {
            status: fetched.status,
            body: String::from_utf8_lossy(&fetched.body).into_owned(),
        })
    }

    async fn get_bytes(&self, url: &str) -> Result<Fetched<Vec<u8>>, FetchError> {
        self.serve(url).await
    }
}

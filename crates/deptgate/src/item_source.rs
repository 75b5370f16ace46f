#![forbid(unsafe_code)]

//! Remote item list.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::RemoteItem;

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, TLS, timeout, or body read failure.
    Transport(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The body was not a list of items.
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "transport error: {msg}"),
            FetchError::Status(code) => write!(f, "server returned status {code}"),
            FetchError::Decode(msg) => write!(f, "malformed payload: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Transport(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// Read-only source of remote items.
pub trait ItemSource: Send + Sync {
    /// Fetch the full list. Blocks; call it from a background task.
    ///
    /// # Errors
    ///
    /// Any transport, status, or decode failure.
    fn list(&self) -> Result<Vec<RemoteItem>, FetchError>;
}

/// Blocking HTTP GET against a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpItemSource {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpItemSource {
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built (e.g. TLS backend init).
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("deptgate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ItemSource for HttpItemSource {
    fn list(&self) -> Result<Vec<RemoteItem>, FetchError> {
        let _span = tracing::debug_span!("deptgate.fetch", endpoint = %self.endpoint).entered();
        let resp = self.client.get(&self.endpoint).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        let items: Vec<RemoteItem> = serde_json::from_str(&body)?;
        tracing::debug!(count = items.len(), "items fetched");
        Ok(items)
    }
}

/// Canned result, for tests and offline runs.
#[derive(Debug)]
pub struct StaticItemSource {
    result: Result<Vec<RemoteItem>, FetchError>,
    calls: AtomicUsize,
}

impl StaticItemSource {
    pub fn ok(items: Vec<RemoteItem>) -> Self {
        Self {
            result: Ok(items),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: FetchError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `list` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ItemSource for StaticItemSource {
    fn list(&self) -> Result<Vec<RemoteItem>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

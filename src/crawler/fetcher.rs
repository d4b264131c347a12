//! HTTP fetcher implementation
//!
//! This module handles the single-request layer of the scraper:
//! - Building the HTTP client with the fixed browser-like header set
//! - Issuing one GET per call
//! - Classifying the outcome as success or failure data
//!
//! Nothing here returns an error; every failure becomes a [`PageFetchResult`].

use crate::config::HttpConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Why a fetch attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// Connection, TLS, timeout or body-read failure
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-2xx status
    #[error("HTTP status {status} for url: {url}")]
    HttpStatus { status: u16, url: String },

    /// 2xx response without a body
    #[error("empty response body for url: {url}")]
    EmptyBody { url: String },
}

/// Outcome of one fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFetchResult {
    /// True for a 2xx response
    pub success: bool,

    /// Response body, empty on failure
    pub body: String,

    /// Final URL after redirects, or the requested URL on failure
    pub url: String,

    /// Human-readable failure description
    pub error: Option<String>,

    /// Failure classification, for logging
    pub failure: Option<FetchFailure>,
}

impl PageFetchResult {
    /// Creates a successful result
    pub fn ok(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            success: true,
            body: body.into(),
            url: url.into(),
            error: None,
            failure: None,
        }
    }

    /// Creates a failed result
    pub fn failed(url: impl Into<String>, failure: FetchFailure) -> Self {
        Self {
            success: false,
            body: String::new(),
            url: url.into(),
            error: Some(failure.to_string()),
            failure: Some(failure),
        }
    }

    /// Returns true if the attempt produced a usable document
    pub fn has_document(&self) -> bool {
        self.success && !self.body.is_empty()
    }
}

/// A single-attempt page fetcher
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches one URL; failures are returned as data, never raised
    async fn fetch(&self, url: &str) -> PageFetchResult;
}

/// Builds an HTTP client that sends the configured header set
///
/// # Arguments
///
/// * `config` - The request header configuration
/// * `timeout` - Overall request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use ensun_scout::config::HttpConfig;
/// use ensun_scout::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&HttpConfig::default(), Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig, timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    // Header text is checked during config validation
    if let Ok(value) = HeaderValue::from_str(&config.accept) {
        headers.insert(ACCEPT, value);
    }
    if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, value);
    }

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`PageFetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher with its own client
    pub fn new(config: &HttpConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config, timeout)?;
        Ok(Self { client, timeout })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> PageFetchResult {
        fetch_url(&self.client, url, self.timeout).await
    }
}

/// Fetches a URL with one GET request
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | success, body and final URL |
/// | non-2xx | failure, `HttpStatus` |
/// | timeout / connect / body read error | failure, `Transport` |
///
/// An empty 2xx body is still reported as success here; the retry layer
/// decides whether that is usable.
pub async fn fetch_url(client: &Client, url: &str, timeout: Duration) -> PageFetchResult {
    let response = match client.get(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => return PageFetchResult::failed(url, classify_transport_error(&e, timeout)),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return PageFetchResult::failed(
            url,
            FetchFailure::HttpStatus {
                status: status.as_u16(),
                url: final_url,
            },
        );
    }

    match response.text().await {
        Ok(body) => PageFetchResult::ok(final_url, body),
        Err(e) => PageFetchResult::failed(url, classify_transport_error(&e, timeout)),
    }
}

fn classify_transport_error(error: &reqwest::Error, timeout: Duration) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Transport(format!(
            "request timed out after {}s: {}",
            timeout.as_secs_f64(),
            error
        ))
    } else if error.is_connect() {
        FetchFailure::Transport(format!("connection failed: {}", error))
    } else {
        FetchFailure::Transport(error.to_string())
    }
}

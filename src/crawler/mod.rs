//! Crawler module for result-page fetching and extraction
//!
//! This module contains the core scraping pipeline, including:
//! - HTTP fetching of single pages
//! - Retry with pre-request delay and escalating backoff
//! - Structural-role lookup and company-card extraction
//! - Page orchestration and result aggregation

mod coordinator;
mod extractor;
mod fetcher;
mod pacer;
mod retry;
mod roles;

pub use coordinator::{
    PageError, ScrapeRequest, Scraper, NO_DATA_ERROR, PARTIAL_FAILURE_ERROR,
};
pub use extractor::{
    classify_info_texts, element_text, parse_card, parse_container, parse_document,
    ContainerParse, InfoField, InfoRule, PageScan, EMPLOYEES_SUFFIX, INFO_RULES,
};
pub use fetcher::{build_http_client, fetch_url, FetchFailure, HttpFetcher, PageFetchResult, PageFetcher};
pub use pacer::{seconds, Pacer, RecordingPacer, TokioPacer};
pub use retry::{RetryPolicy, RetryingFetcher};
pub use roles::{CssRoleSelector, Role, RoleSelector};

use crate::config::Config;
use crate::record::ScrapeResult;
use crate::ScoutError;

/// Runs a complete scrape with the configured HTTP stack
///
/// This is the main entry point for library users. It will:
/// 1. Build the HTTP client and compile the role selectors
/// 2. Fetch every result page in order, with retries
/// 3. Extract company records and collect page errors
///
/// # Returns
///
/// * `Ok(ScrapeResult)` - The scrape ran; page problems are inside the result
/// * `Err(ScoutError)` - Setup failed before any request was sent
pub async fn scrape(config: &Config, request: &ScrapeRequest) -> Result<ScrapeResult, ScoutError> {
    let scraper = Scraper::from_config(config)?;
    Ok(scraper.scrape(request).await)
}

//! Scrape coordinator - page orchestration logic
//!
//! This module contains the main scrape loop that:
//! - Builds the result-page URL list for a query
//! - Fetches each page through the retry layer, one page at a time
//! - Forces one reload when a page has no card containers
//! - Extracts records and aggregates them with per-page diagnostics
//!
//! A scrape never fails as a whole: every page problem becomes one entry in
//! [`ScrapeResult::page_errors`] and the loop moves on.

use crate::config::Config;
use crate::crawler::extractor::parse_document;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::pacer::{seconds, Pacer, TokioPacer};
use crate::crawler::retry::{RetryPolicy, RetryingFetcher};
use crate::crawler::roles::{CssRoleSelector, RoleSelector};
use crate::record::{CompanyRecord, ScrapeResult};
use crate::state::PageState;
use crate::url::build_page_urls;
use crate::ScoutError;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Summary error when at least one page failed
pub const PARTIAL_FAILURE_ERROR: &str = "some pages could not be processed";

/// Summary error when the run produced no records
pub const NO_DATA_ERROR: &str = "no company data found";

/// Why a page contributed no records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// Every fetch attempt failed; carries the last attempt's error
    #[error("{0}")]
    Fetch(String),

    /// No card containers, even after the forced reload
    #[error("no company cards found after reload")]
    MissingContainers,

    /// Containers were present but no card had a usable name
    #[error("no company data parsed")]
    EmptyExtraction,
}

/// Parameters of one scrape run
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeRequest {
    /// Raw search term
    pub query: String,

    /// Result pages to request; values below 1 are treated as 1
    pub page_count: u32,

    /// Retries per fetch after the first attempt
    pub max_retries: u32,

    /// Pause before each attempt and between pages (seconds)
    pub delay_seconds: f64,
}

impl ScrapeRequest {
    /// Creates a request with the default settings (1 page, 2 retries, 2s delay)
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page_count: 1,
            max_retries: 2,
            delay_seconds: 2.0,
        }
    }

    /// Creates a request using the configured scraper settings
    pub fn from_config(query: impl Into<String>, config: &Config) -> Self {
        Self {
            query: query.into(),
            page_count: config.scraper.page_count,
            max_retries: config.scraper.max_retries,
            delay_seconds: config.scraper.delay_seconds,
        }
    }

    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = page_count;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_delay_seconds(mut self, delay_seconds: f64) -> Self {
        self.delay_seconds = delay_seconds;
        self
    }
}

/// Outcome of one page
#[derive(Debug)]
struct PageReport {
    state: PageState,
    title: Option<String>,
    outcome: Result<Vec<CompanyRecord>, PageError>,
}

/// Tracks one page through the state machine
struct PageRun {
    index: usize,
    state: PageState,
}

impl PageRun {
    fn new(index: usize) -> Self {
        Self {
            index,
            state: PageState::Pending,
        }
    }

    fn advance(&mut self, next: PageState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "page {}: illegal transition {} -> {}",
            self.index,
            self.state,
            next
        );
        match self.state.transition(next) {
            Ok(state) => {
                tracing::trace!("Page {}: {} -> {}", self.index, self.state, state);
                self.state = state;
            }
            Err(e) => tracing::error!("Page {}: {}", self.index, e),
        }
    }

    fn finish(
        self,
        title: Option<String>,
        outcome: Result<Vec<CompanyRecord>, PageError>,
    ) -> PageReport {
        PageReport {
            state: self.state,
            title,
            outcome,
        }
    }
}

/// Main scraper structure
///
/// Generic over the fetcher and pacer so the whole pipeline can run against
/// mock servers or scripted fetchers without real waits.
pub struct Scraper<F = HttpFetcher, P = TokioPacer> {
    fetcher: F,
    pacer: P,
    roles: Box<dyn RoleSelector>,
    base_url: Url,
}

impl Scraper<HttpFetcher, TokioPacer> {
    /// Creates a scraper from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Scraper)` - HTTP client built and selectors compiled
    /// * `Err(ScoutError)` - Client, selector or base URL setup failed
    pub fn from_config(config: &Config) -> Result<Self, ScoutError> {
        let timeout = Duration::from_secs(config.scraper.timeout_seconds);
        let fetcher = HttpFetcher::new(&config.http, timeout)?;
        let roles = CssRoleSelector::from_config(&config.selectors)?;
        let base_url = Url::parse(&config.scraper.base_url)?;

        Ok(Self::new(fetcher, TokioPacer, Box::new(roles), base_url))
    }
}

impl<F, P> Scraper<F, P>
where
    F: PageFetcher,
    P: Pacer,
{
    pub fn new(fetcher: F, pacer: P, roles: Box<dyn RoleSelector>, base_url: Url) -> Self {
        Self {
            fetcher,
            pacer,
            roles,
            base_url,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Planned page URLs for a request
    pub fn page_urls(&self, request: &ScrapeRequest) -> Vec<String> {
        build_page_urls(self.base_url.as_str(), &request.query, request.page_count)
    }

    /// Runs a full scrape
    ///
    /// Pages are processed strictly in order. Before every page after the
    /// first the scraper waits `delay_seconds`, on top of the retry layer's
    /// own pre-attempt delay.
    pub async fn scrape(&self, request: &ScrapeRequest) -> ScrapeResult {
        let urls = self.page_urls(request);
        let policy = RetryPolicy::new(request.max_retries, request.delay_seconds);
        let retrying = RetryingFetcher::new(&self.fetcher, &self.pacer, policy);

        tracing::info!(
            "Scraping {} page(s) for '{}' (max retries: {}, delay: {}s)",
            urls.len(),
            request.query,
            request.max_retries,
            request.delay_seconds
        );

        let mut result = ScrapeResult {
            query: request.query.clone(),
            urls: urls.clone(),
            pages_requested: urls.len(),
            ..Default::default()
        };

        for (offset, url) in urls.iter().enumerate() {
            let index = offset + 1;
            if index > 1 {
                self.pacer.pause(seconds(request.delay_seconds)).await;
            }

            tracing::info!("Processing page {}/{}: {}", index, urls.len(), url);
            let report = self.process_page(index, url, &retrying).await;

            if let Some(title) = report.title {
                tracing::info!("Result title: {}", title);
                result.title = title;
            }

            match report.outcome {
                Ok(companies) => {
                    tracing::info!("Page {} yielded {} companies", index, companies.len());
                    result.companies.extend(companies);
                }
                Err(e) => {
                    let message = format!("page {}: {}", index, e);
                    tracing::warn!("{} ({})", message, report.state);
                    result.page_errors.push(message);
                }
            }
        }

        finalize(&mut result);

        tracing::info!(
            "Scrape finished: {} companies, {}/{} pages succeeded",
            result.companies_count,
            result.pages_succeeded,
            result.pages_requested
        );

        result
    }

    /// Fetches and extracts one page
    ///
    /// `Pending → Fetched → ContainersFound → RecordsExtracted` is the happy
    /// path. A page without containers is fetched once more (a full retry
    /// cycle) before it is given up.
    async fn process_page(
        &self,
        index: usize,
        url: &str,
        retrying: &RetryingFetcher<'_, F, P>,
    ) -> PageReport {
        let mut page = PageRun::new(index);

        let fetched = retrying.fetch_with_retry(url).await;
        if !fetched.has_document() {
            page.advance(PageState::FetchFailed);
            let error = fetched
                .error
                .unwrap_or_else(|| "page fetch failed".to_string());
            return page.finish(None, Err(PageError::Fetch(error)));
        }
        page.advance(PageState::Fetched);

        let mut scan = parse_document(&fetched.body, self.roles.as_ref(), &self.base_url);
        let mut title = if index == 1 { scan.title.take() } else { None };

        if scan.containers == 0 {
            page.advance(PageState::ContainersMissing);
            tracing::warn!("Page {}: no company containers found, reloading", index);

            // Full retry cycle; worst case doubles the attempts for this page
            let reloaded = retrying.fetch_with_retry(url).await;
            if reloaded.has_document() {
                scan = parse_document(&reloaded.body, self.roles.as_ref(), &self.base_url);
                if index == 1 && title.is_none() {
                    title = scan.title.take();
                }
            } else {
                tracing::warn!(
                    "Page {}: reload failed: {}",
                    index,
                    reloaded.error.as_deref().unwrap_or("unknown error")
                );
            }

            if scan.containers == 0 {
                page.advance(PageState::ContainersMissingFinal);
                return page.finish(title, Err(PageError::MissingContainers));
            }
        }
        page.advance(PageState::ContainersFound);

        if scan.skipped > 0 {
            tracing::debug!("Page {}: skipped {} unnamed cards", index, scan.skipped);
        }

        if scan.companies.is_empty() {
            page.advance(PageState::NoRecords);
            return page.finish(title, Err(PageError::EmptyExtraction));
        }

        page.advance(PageState::RecordsExtracted);
        page.finish(title, Ok(scan.companies))
    }
}

/// Fills in counts and the summary error
fn finalize(result: &mut ScrapeResult) {
    result.companies_count = result.companies.len();
    result.pages_succeeded = result
        .pages_requested
        .saturating_sub(result.page_errors.len());

    if !result.page_errors.is_empty() {
        result.error = Some(PARTIAL_FAILURE_ERROR.to_string());
    }

    if result.companies.is_empty() && result.error.is_none() {
        result.error = Some(NO_DATA_ERROR.to_string());
    }
}

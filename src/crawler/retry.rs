//! Bounded retry around a single-attempt fetcher
//!
//! The policy is courtesy-first: every attempt, including the first, is
//! preceded by the configured delay, because the site's main failure mode is
//! rate limiting. A failed attempt that still has a successor is followed by
//! an escalating backoff of `max(delay, 2 × attempt)` seconds.

use crate::crawler::fetcher::{FetchFailure, PageFetchResult, PageFetcher};
use crate::crawler::pacer::{seconds, Pacer};
use std::time::Duration;

/// Retry budget and pacing for one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,

    /// Wait before every attempt
    pub delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy from a retry count and a delay in seconds
    pub fn new(max_retries: u32, delay_seconds: f64) -> Self {
        Self {
            max_retries,
            delay: seconds(delay_seconds),
        }
    }

    /// Total number of attempts allowed
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Backoff after the failed 1-based `attempt`
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.delay
            .max(Duration::from_secs(2 * u64::from(attempt)))
    }
}

/// A [`PageFetcher`] wrapped in a [`RetryPolicy`]
pub struct RetryingFetcher<'a, F: ?Sized, P: ?Sized> {
    fetcher: &'a F,
    pacer: &'a P,
    policy: RetryPolicy,
}

impl<'a, F, P> RetryingFetcher<'a, F, P>
where
    F: PageFetcher + ?Sized,
    P: Pacer + ?Sized,
{
    pub fn new(fetcher: &'a F, pacer: &'a P, policy: RetryPolicy) -> Self {
        Self {
            fetcher,
            pacer,
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetches `url` with up to `max_retries + 1` attempts
    ///
    /// An attempt counts only if it succeeded with a non-empty body. When every
    /// attempt fails the returned result carries the last attempt's error.
    pub async fn fetch_with_retry(&self, url: &str) -> PageFetchResult {
        let max_attempts = self.policy.max_attempts();
        let mut last_failure = None;

        for attempt in 1..=max_attempts {
            self.pacer.pause(self.policy.delay).await;

            let result = self.fetcher.fetch(url).await;
            if result.has_document() {
                if attempt > 1 {
                    tracing::info!("Fetched {} on attempt {}/{}", url, attempt, max_attempts);
                }
                return result;
            }

            let result = if result.success {
                PageFetchResult::failed(url, FetchFailure::EmptyBody { url: result.url })
            } else {
                result
            };

            tracing::warn!(
                "Fetch failed (attempt {}/{}): {}",
                attempt,
                max_attempts,
                result.error.as_deref().unwrap_or("unknown error")
            );
            last_failure = Some(result);

            if attempt < max_attempts {
                let backoff = self.policy.backoff_after(attempt);
                tracing::debug!("Retrying {} in {:?}", url, backoff);
                self.pacer.pause(backoff).await;
            }
        }

        last_failure.unwrap_or_else(|| {
            PageFetchResult::failed(url, FetchFailure::Transport("page fetch failed".to_string()))
        })
    }
}

//! Pacing for polite request timing
//!
//! All waits of a scrape run (before each attempt, backoff after a failed
//! attempt, and between pages) go through a [`Pacer`]. The production pacer
//! sleeps on the tokio timer; [`RecordingPacer`] returns immediately and keeps
//! the requested durations so schedules can be asserted.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// A source of blocking waits
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Waits for `duration` before returning
    async fn pause(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tokio::time::sleep(duration).await;
    }
}

/// Records requested waits without sleeping
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every requested wait, in order
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses
            .lock()
            .map(|pauses| pauses.clone())
            .unwrap_or_default()
    }

    /// Total time that would have been spent waiting
    pub fn total(&self) -> Duration {
        self.pauses().iter().sum()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, duration: Duration) {
        if let Ok(mut pauses) = self.pauses.lock() {
            pauses.push(duration);
        }
    }
}

/// Converts a configured delay in seconds to a `Duration`
///
/// Negative and non-finite values become zero.
pub fn seconds(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value)
    } else {
        Duration::ZERO
    }
}

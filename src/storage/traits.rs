//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::record::{CompanyRecord, ScrapeResult};
use crate::storage::{RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// A run is created before scraping starts, receives the finished
/// [`ScrapeResult`] once, and is then closed with a final status.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new run
    ///
    /// # Arguments
    ///
    /// * `query` - The search term being scraped
    /// * `config_hash` - Hash of the configuration file (empty when defaults are used)
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, query: &str, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run as finished with the given status
    fn complete_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    /// Marks a run as failed before any result was recorded
    fn fail_run(&mut self, run_id: i64, error: &str) -> StorageResult<()>;

    // ===== Results =====

    /// Stores the records, page errors and counts of a finished scrape
    ///
    /// Replaces anything previously recorded for the run.
    fn record_result(&mut self, run_id: i64, result: &ScrapeResult) -> StorageResult<()>;

    /// Loads a run's companies in their original order
    fn load_companies(&self, run_id: i64) -> StorageResult<Vec<CompanyRecord>>;

    /// Loads a run's page errors in their original order
    fn load_page_errors(&self, run_id: i64) -> StorageResult<Vec<String>>;

    /// Rebuilds the full result of a run
    fn load_result(&self, run_id: i64) -> StorageResult<ScrapeResult>;
}

//! Storage module for persisting scrape results
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Run tracking (query, config hash, status, counts)
//! - Company records, one row per record with the seven output columns
//! - Page-level error diagnostics

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::record::ScrapeResult;
use crate::ScoutError;
use std::path::Path;

/// Initializes or opens a storage database
pub fn open_storage(path: &Path) -> Result<SqliteStorage, ScoutError> {
    SqliteStorage::new(path)
}

/// Represents a scrape run in the database
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub id: i64,
    pub query: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub title: String,
    pub urls: Vec<String>,
    pub pages_requested: u32,
    pub pages_succeeded: u32,
    pub companies_count: u32,
    pub error: Option<String>,
}

/// Status of a scrape run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    /// Every page contributed records
    Completed,
    /// Some pages failed but records were found
    Partial,
    /// No records were found
    Failed,
}

impl RunStatus {
    /// Derives the final status of a finished scrape
    pub fn for_result(result: &ScrapeResult) -> Self {
        if result.companies.is_empty() {
            Self::Failed
        } else if !result.page_errors.is_empty() {
            Self::Partial
        } else {
            Self::Completed
        }
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "partial" => Some(Self::Partial),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

//! Output exporter traits and error types
//!
//! This module defines the trait interface for result exporters and
//! associated error types.

use crate::record::ScrapeResult;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for result exporters
///
/// An exporter renders a finished [`ScrapeResult`] into one document format.
pub trait ResultExporter {
    /// File extension used for generated file names, without the dot
    fn extension(&self) -> &'static str;

    /// Renders the result as a document
    fn render(&self, result: &ScrapeResult) -> OutputResult<String>;

    /// Renders the result and writes it to `path`
    fn export(&self, result: &ScrapeResult, path: &Path) -> OutputResult<()> {
        let document = self.render(result)?;
        fs::write(path, document).map_err(|source| OutputError::Write {
            path: path.display().to_string(),
            source,
        })
    }
}

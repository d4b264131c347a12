//! Output module for reporting scrape results
//!
//! This module handles:
//! - Rendering markdown reports of a scrape
//! - Dumping the full result as JSON
//! - Exporting the company table as CSV
//! - Printing the console summary and its statistics

mod csv_export;
mod json;
mod markdown;
pub mod stats;
mod traits;

pub use csv_export::{write_csv, CsvExport};
pub use json::{write_json, JsonExport};
pub use markdown::{format_markdown_report, generate_markdown_report, report_heading, MarkdownReport};
pub use stats::{print_summary, ScrapeStatistics};
pub use traits::{OutputError, OutputResult, ResultExporter};

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// File name stem for exports of a query: `ensun_companies_<query>`
///
/// Spaces in the query become underscores.
pub fn export_stem(query: &str) -> String {
    format!("ensun_companies_{}", query.trim().replace(' ', "_"))
}

/// Generated export file name with a timestamp suffix
///
/// Used when no output path is configured.
pub fn default_export_path(
    query: &str,
    exporter: &dyn ResultExporter,
    timestamp: DateTime<Utc>,
) -> PathBuf {
    PathBuf::from(format!(
        "{}_{}.{}",
        export_stem(query),
        timestamp.format("%Y%m%d_%H%M%S"),
        exporter.extension()
    ))
}

//! Markdown report generation
//!
//! This module renders a scrape result as a human-readable markdown report:
//! the result heading, page-error warnings, a page caption and the company
//! table with the seven output columns.

use crate::output::traits::{OutputResult, ResultExporter};
use crate::record::{ScrapeResult, COLUMNS};
use std::path::Path;

/// Exporter producing the markdown report
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownReport;

impl ResultExporter for MarkdownReport {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, result: &ScrapeResult) -> OutputResult<String> {
        Ok(format_markdown_report(result))
    }
}

/// Writes the markdown report for a scrape result
///
/// # Arguments
///
/// * `result` - The finished scrape
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_report(result: &ScrapeResult, output_path: &Path) -> OutputResult<()> {
    MarkdownReport.export(result, output_path)
}

/// Heading line of the report
///
/// The page title when one was captured, otherwise a count line.
pub fn report_heading(result: &ScrapeResult) -> String {
    if !result.title.is_empty() {
        result.title.clone()
    } else {
        format!(
            "{} companies found – query: {}",
            result.companies_count, result.query
        )
    }
}

/// Formats a scrape result as markdown
pub fn format_markdown_report(result: &ScrapeResult) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", escape_inline(&report_heading(result))));

    if result.companies.is_empty() {
        if let Some(error) = &result.error {
            md.push_str(&format!("> **Error:** {}\n\n", escape_inline(error)));
        }
    }

    if !result.page_errors.is_empty() {
        md.push_str("> **Warning:** some pages could not be processed:\n");
        for page_error in &result.page_errors {
            md.push_str(&format!(">\n> - {}\n", escape_inline(page_error)));
        }
        md.push('\n');
    }

    if result.pages_requested > 0 {
        md.push_str(&format!(
            "_Requested: {} pages · Succeeded: {}_\n\n",
            result.pages_requested, result.pages_succeeded
        ));
    }

    if result.companies.is_empty() {
        return md;
    }

    md.push_str(&format!("| {} |\n", COLUMNS.join(" | ")));
    md.push_str(&format!(
        "|{}\n",
        COLUMNS.iter().map(|_| "---|").collect::<String>()
    ));

    for company in &result.companies {
        let cells: Vec<String> = company.values().iter().map(|v| escape_cell(v)).collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    md
}

/// Collapses line breaks so a value stays on one markdown line
fn escape_inline(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escapes a table cell value
fn escape_cell(value: &str) -> String {
    escape_inline(value).replace('|', "\\|")
}

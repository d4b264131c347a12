//! Statistics for a finished scrape
//!
//! This module derives simple counts from a scrape result and prints them
//! as the console summary.

use crate::record::{ScrapeResult, UNKNOWN};

/// Scrape statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeStatistics {
    pub companies: usize,
    pub pages_requested: usize,
    pub pages_succeeded: usize,
    pub pages_failed: usize,

    /// Records with a resolved detail URL
    pub with_detail_url: usize,

    /// Records whose location is known
    pub with_location: usize,
}

impl ScrapeStatistics {
    /// Computes statistics from a scrape result
    pub fn from_result(result: &ScrapeResult) -> Self {
        Self {
            companies: result.companies.len(),
            pages_requested: result.pages_requested,
            pages_succeeded: result.pages_succeeded,
            pages_failed: result.page_errors.len(),
            with_detail_url: result
                .companies
                .iter()
                .filter(|c| !c.detail_url.is_empty())
                .count(),
            with_location: result
                .companies
                .iter()
                .filter(|c| c.location != UNKNOWN)
                .count(),
        }
    }

    /// Returns the page success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.pages_requested == 0 {
            return 0.0;
        }
        (self.pages_succeeded as f64 / self.pages_requested as f64) * 100.0
    }
}

/// Prints a scrape summary to stdout
pub fn print_summary(result: &ScrapeResult) {
    let stats = ScrapeStatistics::from_result(result);

    println!("=== Ensun-Scout Summary ===\n");
    println!("Query: {}", result.query);
    if !result.title.is_empty() {
        println!("Title: {}", result.title);
    }
    println!();

    println!("Pages:");
    println!("  Requested: {}", stats.pages_requested);
    println!("  Succeeded: {}", stats.pages_succeeded);
    println!("  Failed: {}", stats.pages_failed);
    println!();

    println!("Companies: {}", stats.companies);
    println!("  With detail URL: {}", stats.with_detail_url);
    println!("  With known location: {}", stats.with_location);
    println!();

    if !result.page_errors.is_empty() {
        println!("Page Errors:");
        for page_error in &result.page_errors {
            println!("  - {}", page_error);
        }
        println!();
    }

    if let Some(error) = &result.error {
        println!("Error: {}", error);
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages)",
        stats.success_rate(),
        stats.pages_succeeded,
        stats.pages_requested
    );
}

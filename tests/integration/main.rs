//! Integration tests for Ensun-Scout
//!
//! These run the full scrape pipeline against wiremock servers.

mod output_tests;
mod scrape_tests;

//! State module for tracking scrape progress
//!
//! # Components
//!
//! - `PageState`: Tracks one result page from `Pending` to its terminal outcome

mod page_state;

// Re-export main types
pub use page_state::PageState;

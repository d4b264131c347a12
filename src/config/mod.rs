//! Configuration module for Ensun-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use ensun_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ensun.toml")).unwrap();
//! println!("Will request {} pages", config.scraper.page_count);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, HttpConfig, OutputConfig, ScraperConfig, SelectorConfig, DEFAULT_ACCEPT,
    DEFAULT_ACCEPT_LANGUAGE, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;

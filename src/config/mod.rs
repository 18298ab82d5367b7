//! Configuration module for Stay-Sieve
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every setting defaults to the fixed origin, agent
//! identity and language constants.
//!
//! # Example
//!
//! ```no_run
//! use stay_sieve::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("stay-sieve.toml")).unwrap();
//! println!("Fetching from: {}", config.site.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DetailsConfig, SiteConfig, UserAgentConfig, ACCEPT_LANGUAGE, BASE_URL,
    ROBOTS_ERROR_MESSAGE, ROBOTS_PATH, USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;

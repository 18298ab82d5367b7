//! Stay-Sieve: a policy-respecting extractor for stay listings
//!
//! This crate fetches listing-search and listing-detail pages, pulls the
//! embedded client-side state out of the markup, and projects it through
//! allow-list schemas into a small, stable JSON document.

pub mod config;
pub mod crawler;
pub mod output;
pub mod pipeline;
pub mod robots;
pub mod shape;

use thiserror::Error;

/// Main error type for Stay-Sieve operations
#[derive(Debug, Error)]
pub enum SieveError {
    #[error("URL disallowed by robots.txt: {url}")]
    PolicyDisallowed { url: String },

    #[error(transparent)]
    Fetch(#[from] crawler::FetchError),

    #[error("Failed to load robots.txt from {url}: {message}")]
    PolicyLoad { url: String, message: String },

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Upstream operation failed: {0}")]
    Upstream(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL construction errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Base URL cannot carry path segments: {0}")]
    CannotBeABase(String),

    #[error("Missing listing id in URL: {0}")]
    MissingListingId(String),
}

/// Result type alias for Stay-Sieve operations
pub type Result<T> = std::result::Result<T, SieveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, ACCEPT_LANGUAGE, BASE_URL, ROBOTS_ERROR_MESSAGE, ROBOTS_PATH, USER_AGENT};
pub use pipeline::{Envelope, ListingRef, Pipeline, SearchFilters};
pub use robots::ComplianceGate;

//! Report types and output errors

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One search result together with its detail sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedListing {
    /// Listing page URL (empty if the result carried none)
    pub url: String,

    /// The projected search result
    pub listing: Value,

    /// Projected detail sections; `None` if the lookup failed or was skipped
    pub details: Option<Vec<Value>>,
}

/// A search and the detail lookups that followed it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub location: String,
    pub search_url: String,
    pub listings: Vec<DetailedListing>,
}

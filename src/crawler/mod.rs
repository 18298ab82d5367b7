//! Crawler module for page retrieval
//!
//! This module contains:
//! - the fetcher (fixed identity headers, no retries)
//! - embedded-state extraction from fetched markup
//! - the coordinator that fans a search out into detail lookups

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher};
pub use parser::{extract_state, take_at, MalformedStateError, STATE_SELECTOR};

//! Output module for search reports
//!
//! This module handles:
//! - the report types produced by the coordinator
//! - rendering a report as a markdown page

mod markdown;
mod report;

pub use markdown::{render_markdown, write_report};
pub use report::{DetailedListing, OutputError, OutputResult, SearchReport};

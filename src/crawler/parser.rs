//! Embedded-state extraction
//!
//! Listing pages ship their client data as JSON inside a script element.
//! This module finds that element, parses it, and descends to the client
//! data root. Every failure here is a [`MalformedStateError`], which callers
//! treat as "no data" rather than a request failure.

use scraper::{Html, Selector};
use serde_json::Value;
use thiserror::Error;

/// Selector of the element carrying the embedded state
pub const STATE_SELECTOR: &str = "#data-deferred-state-0";

/// Location of the client data root: second member of the first pair
const CLIENT_DATA_POINTER: &str = "/niobeMinimalClientData/0/1";

/// The embedded state is missing or does not have the expected shape
#[derive(Debug, Error)]
pub enum MalformedStateError {
    #[error("no element matches '{0}'")]
    MissingNode(&'static str),

    #[error("embedded state is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("embedded state has no value at '{0}'")]
    MissingPath(String),
}

/// Extracts the client data root from page markup
///
/// # Example
///
/// ```
/// use stay_sieve::crawler::extract_state;
///
/// let html = r#"<html><body><script id="data-deferred-state-0" type="application/json">
///     {"niobeMinimalClientData": [["query", {"data": {"ok": true}}]]}
/// </script></body></html>"#;
/// let root = extract_state(html).unwrap();
/// assert_eq!(root["data"]["ok"], true);
/// ```
pub fn extract_state(markup: &str) -> Result<Value, MalformedStateError> {
    let document = Html::parse_document(markup);
    let selector = Selector::parse(STATE_SELECTOR)
        .map_err(|_| MalformedStateError::MissingNode(STATE_SELECTOR))?;

    let node = document
        .select(&selector)
        .next()
        .ok_or(MalformedStateError::MissingNode(STATE_SELECTOR))?;

    let text = node.text().collect::<String>();
    let mut state: Value = serde_json::from_str(&text)?;

    take_at(&mut state, CLIENT_DATA_POINTER)
}

/// Moves the value at a JSON pointer out of `value`
///
/// A `null` at the pointer counts as missing.
pub fn take_at(value: &mut Value, pointer: &str) -> Result<Value, MalformedStateError> {
    value
        .pointer_mut(pointer)
        .map(Value::take)
        .filter(|found| !found.is_null())
        .ok_or_else(|| MalformedStateError::MissingPath(pointer.to_string()))
}

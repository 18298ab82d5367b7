//! Uniform response wrapper for both pipeline operations

use crate::config::ROBOTS_ERROR_MESSAGE;
use crate::SieveError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One piece of envelope content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

/// `{ content: [{ type: "text", text }], isError }`
///
/// `text` is a pretty-printed JSON document: the payload on success, an
/// [`ErrorPayload`] otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub content: Vec<Content>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

/// Payload of a failed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
    pub url: String,
}

/// Payload of a successful search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPayload {
    pub search_url: String,
    #[serde(default)]
    pub search_results: Vec<Value>,
    #[serde(default)]
    pub pagination_info: Value,
}

/// Payload of a successful listing-detail lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsPayload {
    pub listing_url: String,
    #[serde(default)]
    pub details: Vec<Value>,
}

impl Envelope {
    /// Wraps a payload as a success
    ///
    /// A payload that fails to serialize turns into an error envelope.
    pub fn success<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_string_pretty(payload) {
            Ok(text) => Self::text(text, false),
            Err(e) => Self::error(format!("Failed to serialize payload: {}", e), ""),
        }
    }

    /// Wraps an error message and the URL it concerns
    pub fn error(message: impl Into<String>, url: impl Into<String>) -> Self {
        let payload = ErrorPayload {
            error: message.into(),
            url: url.into(),
        };
        // Two string fields always serialize
        let text = serde_json::to_string_pretty(&payload).unwrap_or_default();
        Self::text(text, true)
    }

    /// Maps a hard pipeline failure to an error envelope
    pub fn from_error(error: &SieveError, url: &str) -> Self {
        let message = match error {
            SieveError::PolicyDisallowed { .. } => ROBOTS_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        };
        Self::error(message, url)
    }

    fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![Content::Text { text }],
            is_error,
        }
    }

    /// Text of the first content item
    pub fn first_text(&self) -> &str {
        match self.content.first() {
            Some(Content::Text { text }) => text,
            None => "",
        }
    }

    /// Parses the first content item as a typed payload
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, SieveError> {
        Ok(serde_json::from_str(self.first_text())?)
    }

    /// Parses the error payload of a failed envelope
    pub fn error_payload(&self) -> Option<ErrorPayload> {
        if !self.is_error {
            return None;
        }
        self.payload().ok()
    }
}

use crate::crawler::{take_at, MalformedStateError};
use crate::pipeline::envelope::{DetailsPayload, Envelope};
use crate::pipeline::params::ListingRef;
use crate::pipeline::schemas::SectionKind;
use crate::pipeline::Pipeline;
use crate::shape::{project_flat, sanitize};
use serde_json::{Map, Value};

const SECTIONS_POINTER: &str = "/data/presentation/stayProductDetailPage/sections/sections";

impl Pipeline {
    /// Fetches one listing's detail page
    ///
    /// Same failure policy as [`Pipeline::search`]: hard errors become
    /// error envelopes, an unreadable page yields an empty `details` list.
    pub async fn listing_details(&self, listing: &ListingRef) -> Envelope {
        let listing_url = match listing.listing_url(self.base_url()) {
            Ok(url) => url,
            Err(e) => return Envelope::error(e.to_string(), self.base_url().as_str()),
        };

        let stage = match self
            .retrieve_state(&listing_url, listing.ignore_robots_text)
            .await
        {
            Ok(stage) => stage,
            Err(e) => {
                tracing::error!("Listing lookup failed for {}: {}", listing_url, e);
                return Envelope::from_error(&e, listing_url.as_str());
            }
        };

        let details = stage
            .and_then(shape_sections)
            .unwrap_or_log(listing_url.as_str(), Vec::new());

        tracing::info!(
            "Listing {} yielded {} sections",
            listing.id,
            details.len()
        );

        Envelope::success(&DetailsPayload {
            listing_url: listing_url.to_string(),
            details,
        })
    }
}

fn shape_sections(mut root: Value) -> Result<Vec<Value>, MalformedStateError> {
    match take_at(&mut root, SECTIONS_POINTER)? {
        Value::Array(sections) => Ok(sections.into_iter().filter_map(shape_section).collect()),
        _ => Err(MalformedStateError::MissingPath(SECTIONS_POINTER.to_string())),
    }
}

/// Shapes one allow-listed section as `{ id, ...projected body }`
fn shape_section(mut section: Value) -> Option<Value> {
    sanitize(&mut section);

    let kind = section
        .get("sectionId")
        .and_then(Value::as_str)
        .and_then(SectionKind::from_id)?;

    let mut detail = Map::new();
    detail.insert("id".to_string(), Value::String(kind.id().to_string()));

    if let Some(body) = section.get("section") {
        match project_flat(body, &kind.schema()) {
            Value::Object(fields) => detail.extend(fields),
            other => tracing::debug!("Section {} body is not an object: {}", kind.id(), other),
        }
    }

    Some(Value::Object(detail))
}

//! Search-then-details coordination
//!
//! Runs one search, then fetches the detail page of the leading results
//! concurrently. Concurrency is bounded by a semaphore so the origin never
//! sees more than `max-concurrent-fetches` detail requests at once.

use crate::config::DetailsConfig;
use crate::output::{DetailedListing, SearchReport};
use crate::pipeline::{
    listing_id_from_url, DetailsPayload, Envelope, ListingRef, Pipeline, SearchFilters,
    SearchPayload,
};
use crate::SieveError;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Drives a search and the detail lookups that follow it
pub struct Coordinator {
    pipeline: Pipeline,
    semaphore: Arc<Semaphore>,
    max_listings: usize,
}

impl Coordinator {
    /// Creates a coordinator sharing the pipeline's compliance gate
    pub fn new(pipeline: Pipeline, config: &DetailsConfig) -> Self {
        Self {
            pipeline,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_fetches.max(1))),
            max_listings: config.max_listings,
        }
    }

    /// Runs the search and expands up to `max-listings` results
    ///
    /// # Returns
    ///
    /// * `Ok(SearchReport)` - Listings in search order; a listing whose
    ///   detail lookup failed has `details: None`
    /// * `Err(SieveError)` - The search itself failed
    pub async fn run(&self, filters: &SearchFilters) -> Result<SearchReport, SieveError> {
        let envelope = self.pipeline.search(filters).await;
        if let Some(error) = envelope.error_payload() {
            return Err(SieveError::Upstream(format!("{} ({})", error.error, error.url)));
        }
        let payload: SearchPayload = envelope.payload()?;

        let mut listings: Vec<DetailedListing> = payload
            .search_results
            .into_iter()
            .take(self.max_listings)
            .map(|listing| DetailedListing {
                url: listing
                    .get("url")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                listing,
                details: None,
            })
            .collect();

        let mut tasks = JoinSet::new();
        for (index, listing) in listings.iter().enumerate() {
            let id = match listing_id_from_url(&listing.url) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!("Skipping details for result {}: {}", index, e);
                    continue;
                }
            };

            let reference = ListingRef {
                id,
                checkin: filters.checkin.clone(),
                checkout: filters.checkout.clone(),
                guests: filters.guests,
                ignore_robots_text: filters.ignore_robots_text,
            };
            let pipeline = self.pipeline.clone();
            let semaphore = Arc::clone(&self.semaphore);

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (index, None);
                };
                let envelope = pipeline.listing_details(&reference).await;
                (index, details_of(envelope))
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, details)) => listings[index].details = details,
                Err(e) => tracing::error!("Detail task failed: {}", e),
            }
        }

        Ok(SearchReport {
            location: filters.location.clone(),
            search_url: payload.search_url,
            listings,
        })
    }
}

fn details_of(envelope: Envelope) -> Option<Vec<Value>> {
    if let Some(error) = envelope.error_payload() {
        tracing::warn!("Detail lookup failed for {}: {}", error.url, error.error);
        return None;
    }

    match envelope.payload::<DetailsPayload>() {
        Ok(payload) => Some(payload.details),
        Err(e) => {
            tracing::warn!("Unreadable detail payload: {}", e);
            None
        }
    }
}

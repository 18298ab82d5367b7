//! Search and listing-detail pipelines
//!
//! Both operations follow the same path:
//! 1. Build the target URL from the request
//! 2. Check it against the compliance gate (unless overridden)
//! 3. Fetch the page
//! 4. Extract the embedded state
//! 5. Sanitize, project and flatten the relevant node
//! 6. Wrap the result in an [`Envelope`]
//!
//! Policy and fetch failures are hard: they end the request with an error
//! envelope. Extraction failures are soft: the request still succeeds with
//! an empty result.

mod envelope;
mod listing;
mod params;
mod schemas;
mod search;

pub use envelope::{Content, DetailsPayload, Envelope, ErrorPayload, SearchPayload};
pub use params::{
    listing_id_from_url, path_and_query, rooms_url, GuestCounts, ListingRef, SearchFilters,
};
pub use schemas::{search_result_schema, SectionKind};

use crate::config::Config;
use crate::crawler::{extract_state, Fetcher, MalformedStateError};
use crate::robots::ComplianceGate;
use crate::SieveError;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Outcome of a stage that may degrade instead of failing
#[derive(Debug)]
pub enum Stage<T> {
    /// The stage produced data
    Data(T),
    /// The page shape was not what we expected; continue with nothing
    Degraded(MalformedStateError),
}

impl<T> Stage<T> {
    /// Chains a fallible shaping step; its failure degrades the stage
    pub fn and_then<U, F>(self, f: F) -> Stage<U>
    where
        F: FnOnce(T) -> Result<U, MalformedStateError>,
    {
        match self {
            Self::Data(data) => match f(data) {
                Ok(next) => Stage::Data(next),
                Err(e) => Stage::Degraded(e),
            },
            Self::Degraded(e) => Stage::Degraded(e),
        }
    }

    /// Returns the data, or logs the degradation and returns `fallback`
    pub fn unwrap_or_log(self, url: &str, fallback: T) -> T {
        match self {
            Self::Data(data) => data,
            Self::Degraded(e) => {
                tracing::warn!("Could not read embedded state of {}: {}", url, e);
                fallback
            }
        }
    }
}

/// Entry point for both pipeline operations
///
/// Holds the shared compliance gate; cloning the pipeline shares it.
#[derive(Debug, Clone)]
pub struct Pipeline {
    base_url: Url,
    gate: Arc<ComplianceGate>,
    fetcher: Fetcher,
}

impl Pipeline {
    /// Builds a pipeline from configuration
    ///
    /// The gate starts empty; call [`Pipeline::load_policy`] to fill it.
    pub fn new(config: &Config) -> Result<Self, SieveError> {
        let fetcher = Fetcher::new(&config.user_agent)?;
        let gate = Arc::new(ComplianceGate::new(config.site.robots_url()));
        Self::with_parts(&config.site.base_url, gate, fetcher)
    }

    /// Builds a pipeline around an existing gate and fetcher
    pub fn with_parts(
        base_url: &str,
        gate: Arc<ComplianceGate>,
        fetcher: Fetcher,
    ) -> Result<Self, SieveError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(crate::UrlError::CannotBeABase(base_url.to_string()).into());
        }

        Ok(Self {
            base_url,
            gate,
            fetcher,
        })
    }

    /// Origin all target URLs are built on
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The shared compliance gate
    pub fn gate(&self) -> &Arc<ComplianceGate> {
        &self.gate
    }

    /// Loads the crawling policy into the gate
    pub async fn load_policy(&self) {
        self.gate.load_policy(&self.fetcher).await;
    }

    /// Reloads the crawling policy if it is missing or stale
    pub async fn refresh_policy(&self) -> bool {
        self.gate.refresh_if_stale(&self.fetcher).await
    }

    /// Gate check, fetch and extraction shared by both operations
    async fn retrieve_state(&self, url: &Url, ignore_policy: bool) -> Result<Stage<Value>, SieveError> {
        if !ignore_policy
            && !self
                .gate
                .is_allowed(&path_and_query(url), self.fetcher.user_agent())
        {
            return Err(SieveError::PolicyDisallowed {
                url: url.to_string(),
            });
        }

        let page = self.fetcher.fetch_page(url.as_str()).await?;
        tracing::debug!(
            "Fetched {} ({}, {} bytes)",
            page.final_url,
            page.status_code,
            page.body.len()
        );

        Ok(match extract_state(&page.body) {
            Ok(root) => Stage::Data(root),
            Err(e) => Stage::Degraded(e),
        })
    }
}

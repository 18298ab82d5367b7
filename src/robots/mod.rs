//! Robots.txt handling module
//!
//! This module provides the compliance gate: it fetches the origin's
//! robots.txt once, caches it, and decides whether a path may be fetched
//! for a given agent. A missing or unreadable policy means allow-all.

mod cache;
mod parser;

pub use cache::CachedRobots;
pub use parser::{product_token, ParsedRobots};

use crate::config::ROBOTS_ERROR_MESSAGE;
use crate::crawler::Fetcher;
use crate::SieveError;
use std::sync::{PoisonError, RwLock};

/// Fetches and parses robots.txt from the given URL
///
/// # Returns
///
/// * `Ok(ParsedRobots)` - Successfully fetched robots.txt
/// * `Err(SieveError)` - Transport failure or non-success status
pub async fn fetch_robots(fetcher: &Fetcher, robots_url: &str) -> Result<ParsedRobots, SieveError> {
    let page = fetcher.fetch_page(robots_url).await?;

    if !(200..300).contains(&page.status_code) {
        return Err(SieveError::PolicyLoad {
            url: robots_url.to_string(),
            message: format!("unexpected status {}", page.status_code),
        });
    }

    Ok(ParsedRobots::from_content(&page.body))
}

/// Compliance gate guarding every outbound page fetch
///
/// The cached policy has a single writer path (`load_policy`); reads are
/// shared. Concurrent loads are idempotent, the last one wins.
#[derive(Debug)]
pub struct ComplianceGate {
    robots_url: String,
    policy: RwLock<Option<CachedRobots>>,
}

impl ComplianceGate {
    /// Creates a gate with no policy loaded (allows everything)
    pub fn new(robots_url: impl Into<String>) -> Self {
        Self {
            robots_url: robots_url.into(),
            policy: RwLock::new(None),
        }
    }

    /// Creates a gate preloaded with the given robots.txt content
    pub fn with_policy(robots_url: impl Into<String>, content: &str) -> Self {
        Self {
            robots_url: robots_url.into(),
            policy: RwLock::new(Some(CachedRobots::new(ParsedRobots::from_content(content)))),
        }
    }

    /// URL the policy is loaded from
    pub fn robots_url(&self) -> &str {
        &self.robots_url
    }

    /// Returns true if a policy is currently cached
    pub fn is_loaded(&self) -> bool {
        self.policy
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Fetches and caches the policy
    ///
    /// Failures are never propagated: they are logged and the gate falls
    /// back to allow-all.
    pub async fn load_policy(&self, fetcher: &Fetcher) {
        let loaded = match fetch_robots(fetcher, &self.robots_url).await {
            Ok(robots) => {
                tracing::info!("Loaded robots.txt from {}", self.robots_url);
                Some(CachedRobots::new(robots))
            }
            Err(e) => {
                tracing::warn!("Error fetching robots.txt: {}; allowing all paths", e);
                None
            }
        };

        *self.policy.write().unwrap_or_else(PoisonError::into_inner) = loaded;
    }

    /// Loads the policy if none is cached or the cached one is stale
    ///
    /// Returns true if a load was attempted.
    pub async fn refresh_if_stale(&self, fetcher: &Fetcher) -> bool {
        let needs_load = self
            .policy
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(true, CachedRobots::is_stale);

        if needs_load {
            self.load_policy(fetcher).await;
        }
        needs_load
    }

    /// Checks whether `path` (path plus query) may be fetched by `user_agent`
    ///
    /// # Arguments
    ///
    /// * `path` - The path and query of the target URL
    /// * `user_agent` - The full agent string; only its product token is matched
    ///
    /// # Returns
    ///
    /// * `true` - If no policy is cached or the policy allows the path
    /// * `false` - If the cached policy disallows the path
    pub fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        let guard = self.policy.read().unwrap_or_else(PoisonError::into_inner);
        let Some(cached) = guard.as_ref() else {
            return true;
        };

        let allowed = cached.is_allowed(path, user_agent);
        if !allowed {
            tracing::info!(path, "{}", ROBOTS_ERROR_MESSAGE);
        }
        allowed
    }
}

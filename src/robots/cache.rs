//! Robots.txt caching implementation
//!
//! A loaded policy is kept together with the time it was fetched so the
//! gate can refresh it once a day.

use crate::robots::ParsedRobots;
use chrono::{DateTime, Duration, Utc};

/// Cached robots.txt data for the origin
#[derive(Debug, Clone)]
pub struct CachedRobots {
    /// The parsed robots.txt content
    pub content: ParsedRobots,

    /// When the robots.txt was fetched
    pub fetched_at: DateTime<Utc>,
}

impl CachedRobots {
    /// Creates a new CachedRobots stamped with the current time
    ///
    /// # Arguments
    ///
    /// * `content` - The parsed robots.txt content
    ///
    /// # Returns
    ///
    /// A new CachedRobots instance with the current timestamp
    pub fn new(content: ParsedRobots) -> Self {
        Self {
            content,
            fetched_at: Utc::now(),
        }
    }

    /// Checks if the cached robots.txt is older than 24 hours
    ///
    /// # Returns
    ///
    /// * `true` - If the policy should be fetched again
    /// * `false` - If the cached policy is still fresh
    pub fn is_stale(&self) -> bool {
        self.age() > Duration::hours(24)
    }

    /// Returns how long ago the robots.txt was fetched
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }

    /// Checks if a path is allowed according to the cached robots.txt
    ///
    /// # Arguments
    ///
    /// * `path` - The path and query to check
    /// * `user_agent` - The full agent string
    ///
    /// # Returns
    ///
    /// * `true` - If the path is allowed
    /// * `false` - If the path is disallowed
    pub fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        self.content.is_allowed(path, user_agent)
    }
}

use serde::{Deserialize, Serialize};

/// Origin of the listing pages
pub const BASE_URL: &str = "https://www.airbnb.com";

/// Agent identity sent with every request and checked against robots.txt
pub const USER_AGENT: &str =
    "ModelContextProtocol/1.0 (Autonomous; +https://github.com/modelcontextprotocol/servers)";

/// Language preference sent with every request
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Well-known crawling policy path on the origin
pub const ROBOTS_PATH: &str = "/robots.txt";

/// Message returned to callers when a path is disallowed
pub const ROBOTS_ERROR_MESSAGE: &str = "This path is disallowed by Airbnb's robots.txt to this User-agent. You may or may not want to run the server with '--ignore-robots-txt' args";

/// Main configuration structure for Stay-Sieve
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub details: DetailsConfig,
}

/// Target origin configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Base URL of the origin (scheme + host, optional port)
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Path of the crawling policy on the origin
    #[serde(rename = "robots-path", default = "default_robots_path")]
    pub robots_path: String,

    /// Skip loading robots.txt and bypass the policy check for every request
    #[serde(rename = "ignore-robots-txt", default)]
    pub ignore_robots_txt: bool,
}

impl SiteConfig {
    /// Absolute URL of the crawling policy
    pub fn robots_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.robots_path)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            robots_path: default_robots_path(),
            ignore_robots_txt: false,
        }
    }
}

/// Agent identification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserAgentConfig {
    /// Full User-Agent header value
    #[serde(default = "default_user_agent")]
    pub value: String,

    /// Accept-Language header value
    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

/// Listing-detail fan-out configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetailsConfig {
    /// How many search results get their detail page fetched
    #[serde(rename = "max-listings", default = "default_max_listings")]
    pub max_listings: usize,

    /// Maximum number of detail pages fetched at the same time
    #[serde(rename = "max-concurrent-fetches", default = "default_max_concurrent")]
    pub max_concurrent_fetches: usize,
}

impl Default for DetailsConfig {
    fn default() -> Self {
        Self {
            max_listings: default_max_listings(),
            max_concurrent_fetches: default_max_concurrent(),
        }
    }
}

fn default_base_url() -> String {
    BASE_URL.to_string()
}

fn default_robots_path() -> String {
    ROBOTS_PATH.to_string()
}

fn default_user_agent() -> String {
    USER_AGENT.to_string()
}

fn default_accept_language() -> String {
    ACCEPT_LANGUAGE.to_string()
}

fn default_max_listings() -> usize {
    5
}

fn default_max_concurrent() -> usize {
    3
}

//! HTTP fetcher implementation
//!
//! Every request goes out with the same agent identity and language
//! preference. There is no retry logic and no timeout beyond the
//! transport's defaults; failures go straight back to the caller.

use crate::config::UserAgentConfig;
use crate::SieveError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use thiserror::Error;

/// Transport failure while retrieving a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Failed to read body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

/// A retrieved page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
}

/// Page fetcher with fixed identity headers
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    user_agent: String,
}

impl Fetcher {
    /// Builds a fetcher that sends the configured User-Agent and Accept-Language
    ///
    /// # Arguments
    ///
    /// * `config` - Agent identity and language preference
    ///
    /// # Returns
    ///
    /// * `Ok(Fetcher)` - A fetcher ready to use
    /// * `Err(SieveError)` - A header value is invalid or the client failed to build
    ///
    /// # Example
    ///
    /// ```no_run
    /// use stay_sieve::config::UserAgentConfig;
    /// use stay_sieve::crawler::Fetcher;
    ///
    /// let fetcher = Fetcher::new(&UserAgentConfig::default()).unwrap();
    /// ```
    pub fn new(config: &UserAgentConfig) -> Result<Self, SieveError> {
        let client = build_http_client(config)?;
        Ok(Self {
            client,
            user_agent: config.value.clone(),
        })
    }

    /// The agent identity this fetcher announces
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Fetches a URL with a GET request
    ///
    /// Non-success statuses are not errors here: the body is still returned
    /// and the status is logged, leaving interpretation to the caller.
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to fetch
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedPage)` - The final URL, status code and body
    /// * `Err(FetchError)` - The request could not be sent or the body not read
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            tracing::warn!("{} answered with status {}", url, status);
        }

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            body,
        })
    }
}

/// Builds an HTTP client carrying the fixed identity headers
///
/// # Arguments
///
/// * `config` - Agent identity and language preference
///
/// # Returns
///
/// * `Ok(Client)` - A client with gzip and brotli enabled
/// * `Err(SieveError)` - A header value is invalid or the client failed to build
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, SieveError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(&config.value)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&config.accept_language)?,
    );

    let client = Client::builder()
        .default_headers(headers)
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(FetchError::Client)?;

    Ok(client)
}

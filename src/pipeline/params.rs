//! Request parameters and target URL construction

use crate::{UrlError, UrlResult};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use url::Url;

/// Characters left bare in a path component; everything else is escaped
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Guest counts shared by search and detail requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuestCounts {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub pets: u32,
}

impl Default for GuestCounts {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants: 0,
            pets: 0,
        }
    }
}

impl GuestCounts {
    /// Query pairs for these counts
    ///
    /// All four are emitted only when adults + children > 0. A party of
    /// only infants and pets sends none of them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        if self.adults.saturating_add(self.children) == 0 {
            return Vec::new();
        }

        vec![
            ("adults", self.adults.to_string()),
            ("children", self.children.to_string()),
            ("infants", self.infants.to_string()),
            ("pets", self.pets.to_string()),
        ]
    }
}

/// Filters for a listing search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    pub location: String,
    pub place_id: Option<String>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    #[serde(flatten)]
    pub guests: GuestCounts,
    pub min_price: Option<u32>,
    pub max_price: Option<u32>,
    pub cursor: Option<String>,
    /// Bypass the compliance gate for this request
    pub ignore_robots_text: bool,
}

impl SearchFilters {
    /// Filters for a location with every other field at its default
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    /// Builds `{base}/s/{location}/homes?...`
    pub fn search_url(&self, base: &Url) -> UrlResult<Url> {
        let mut url = with_segments(base, &["s", self.location.as_str(), "homes"])?;

        let mut pairs = Vec::new();
        push_text(&mut pairs, "place_id", &self.place_id);
        push_text(&mut pairs, "checkin", &self.checkin);
        push_text(&mut pairs, "checkout", &self.checkout);
        pairs.extend(self.guests.query_pairs());
        push_price(&mut pairs, "price_min", self.min_price);
        push_price(&mut pairs, "price_max", self.max_price);
        push_text(&mut pairs, "cursor", &self.cursor);

        set_query(&mut url, pairs);
        Ok(url)
    }
}

/// Reference to one listing's detail page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingRef {
    pub id: String,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    #[serde(flatten)]
    pub guests: GuestCounts,
    /// Bypass the compliance gate for this request
    pub ignore_robots_text: bool,
}

impl ListingRef {
    /// Reference to a listing with default guests and no dates
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Builds `{base}/rooms/{id}?...`
    pub fn listing_url(&self, base: &Url) -> UrlResult<Url> {
        let mut url = rooms_url(base, &self.id)?;

        let mut pairs = Vec::new();
        push_text(&mut pairs, "check_in", &self.checkin);
        push_text(&mut pairs, "check_out", &self.checkout);
        pairs.extend(self.guests.query_pairs());

        set_query(&mut url, pairs);
        Ok(url)
    }
}

/// Builds the bare `{base}/rooms/{id}` URL
pub fn rooms_url(base: &Url, id: &str) -> UrlResult<Url> {
    with_segments(base, &["rooms", id])
}

/// Returns the listing id of a `/rooms/{id}` URL
pub fn listing_id_from_url(url: &str) -> UrlResult<String> {
    let parsed = Url::parse(url).map_err(|_| UrlError::MissingListingId(url.to_string()))?;
    let mut segments = parsed
        .path_segments()
        .ok_or_else(|| UrlError::MissingListingId(url.to_string()))?;

    segments
        .by_ref()
        .find(|segment| *segment == "rooms")
        .and_then(|_| segments.next())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| UrlError::MissingListingId(url.to_string()))
}

/// Path plus query, the form the compliance gate evaluates
pub fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Appends escaped segments to the base path, dropping any query or fragment
fn with_segments(base: &Url, segments: &[&str]) -> UrlResult<Url> {
    if base.cannot_be_a_base() {
        return Err(UrlError::CannotBeABase(base.to_string()));
    }

    let mut path = base.path().trim_end_matches('/').to_string();
    for segment in segments {
        path.push('/');
        path.extend(utf8_percent_encode(segment, COMPONENT));
    }

    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.set_path(&path);
    Ok(url)
}

fn push_text(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: &Option<String>) {
    if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
        pairs.push((key, value.to_string()));
    }
}

fn push_price(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<u32>) {
    if let Some(price) = value.filter(|p| *p > 0) {
        pairs.push((key, price.to_string()));
    }
}

fn set_query(url: &mut Url, pairs: Vec<(&'static str, String)>) {
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
}

use crate::crawler::{take_at, MalformedStateError};
use crate::pipeline::envelope::{Envelope, SearchPayload};
use crate::pipeline::params::{rooms_url, SearchFilters};
use crate::pipeline::schemas::search_result_schema;
use crate::pipeline::Pipeline;
use crate::shape::{project_flat, sanitize};
use serde_json::{Map, Value};
use url::Url;

const RESULTS_POINTER: &str = "/data/presentation/staysSearch/results";

/// Search results after shaping
#[derive(Debug, Default)]
struct ShapedResults {
    items: Vec<Value>,
    pagination_info: Value,
}

impl Pipeline {
    /// Runs a listing search
    ///
    /// Never fails: policy and fetch errors come back as error envelopes,
    /// an unreadable page as a success with no results.
    pub async fn search(&self, filters: &SearchFilters) -> Envelope {
        let search_url = match filters.search_url(self.base_url()) {
            Ok(url) => url,
            Err(e) => return Envelope::error(e.to_string(), self.base_url().as_str()),
        };

        let stage = match self
            .retrieve_state(&search_url, filters.ignore_robots_text)
            .await
        {
            Ok(stage) => stage,
            Err(e) => {
                tracing::error!("Search failed for {}: {}", search_url, e);
                return Envelope::from_error(&e, search_url.as_str());
            }
        };

        let shaped = stage
            .and_then(|root| shape_results(root, self.base_url()))
            .unwrap_or_log(search_url.as_str(), ShapedResults::default());

        tracing::info!(
            "Search {} returned {} results",
            search_url,
            shaped.items.len()
        );

        Envelope::success(&SearchPayload {
            search_url: search_url.to_string(),
            search_results: shaped.items,
            pagination_info: shaped.pagination_info,
        })
    }
}

fn shape_results(mut root: Value, base_url: &Url) -> Result<ShapedResults, MalformedStateError> {
    let mut results = take_at(&mut root, RESULTS_POINTER)?;
    sanitize(&mut results);

    let items = match results.get("searchResults") {
        Some(Value::Array(items)) => items,
        _ => {
            return Err(MalformedStateError::MissingPath(format!(
                "{}/searchResults",
                RESULTS_POINTER
            )))
        }
    };

    let schema = search_result_schema();
    let items = items
        .iter()
        .map(|item| with_listing_url(project_flat(item, &schema), base_url))
        .collect();

    Ok(ShapedResults {
        items,
        pagination_info: results.get("paginationInfo").cloned().unwrap_or(Value::Null),
    })
}

/// Puts `url` (`{base}/rooms/{listing.id}`) in front of the projected fields
fn with_listing_url(item: Value, base_url: &Url) -> Value {
    let Value::Object(fields) = item else {
        return item;
    };

    let listing_id = fields
        .get("listing")
        .and_then(|listing| listing.get("id"))
        .and_then(|id| match id {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        });

    let mut shaped = Map::new();
    match listing_id.map(|id| rooms_url(base_url, &id)) {
        Some(Ok(url)) => {
            shaped.insert("url".to_string(), Value::String(url.to_string()));
        }
        Some(Err(e)) => tracing::debug!("No listing URL: {}", e),
        None => tracing::debug!("Search result without listing id"),
    }
    shaped.extend(fields);
    Value::Object(shaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://www.airbnb.com").unwrap()
    }

    fn client_root(results: Value) -> Value {
        json!({"data": {"presentation": {"staysSearch": {"results": results}}}})
    }

    #[test]
    fn test_shape_results_projects_and_flattens() {
        let root = client_root(json!({
            "__typename": "StaysSearchResults",
            "searchResults": [{
                "__typename": "StaySearchResult",
                "listing": {
                    "id": "998877",
                    "name": "Canal loft",
                    "coordinate": {"latitude": 52.37, "longitude": 4.89},
                    "contextualPictures": [{"picture": "https://img"}],
                    "structuredContent": {"primaryLine": [{"body": "2 beds"}]}
                },
                "avgRatingA11yLabel": "4.9 out of 5",
                "structuredDisplayPrice": {
                    "primaryLine": {"accessibilityLabel": "€120 per night", "price": "€120"},
                    "explanationData": {
                        "title": "Price details",
                        "priceDetails": [{"items": [
                            {"description": "5 nights", "priceString": "€600", "extra": 1}
                        ]}]
                    }
                }
            }],
            "paginationInfo": {"nextPageCursor": "abc", "pageCursors": ["a", "b"]}
        }));

        let shaped = shape_results(root, &base()).unwrap();

        assert_eq!(shaped.items.len(), 1);
        assert_eq!(
            shaped.items[0],
            json!({
                "url": "https://www.airbnb.com/rooms/998877",
                "listing": {
                    "id": "998877",
                    "name": "Canal loft",
                    "coordinate": {"latitude": 52.37, "longitude": 4.89},
                    "structuredContent": {"primaryLine": {"body": "2 beds"}}
                },
                "avgRatingA11yLabel": "4.9 out of 5",
                "structuredDisplayPrice": {
                    "primaryLine": {"accessibilityLabel": "€120 per night"},
                    "explanationData": {
                        "title": "Price details",
                        "priceDetails": {"items": {"description": "5 nights", "priceString": "€600"}}
                    }
                }
            })
        );
        assert_eq!(
            shaped.pagination_info,
            json!({"nextPageCursor": "abc", "pageCursors": ["a", "b"]})
        );
    }

    #[test]
    fn test_url_is_first_key() {
        let item = with_listing_url(json!({"listing": {"id": 5}}), &base());
        let keys: Vec<&String> = item.as_object().unwrap().keys().collect();

        assert_eq!(keys, ["url", "listing"]);
        assert_eq!(item["url"], "https://www.airbnb.com/rooms/5");
    }

    #[test]
    fn test_missing_listing_id_leaves_item_without_url() {
        let item = with_listing_url(json!({"avgRatingA11yLabel": "New"}), &base());
        assert_eq!(item, json!({"avgRatingA11yLabel": "New"}));
    }

    #[test]
    fn test_missing_results_node_degrades() {
        let root = json!({"data": {"presentation": {}}});
        assert!(matches!(
            shape_results(root, &base()),
            Err(MalformedStateError::MissingPath(_))
        ));

        let root = client_root(json!({"searchResults": "nope"}));
        assert!(shape_results(root, &base()).is_err());
    }

    #[test]
    fn test_missing_pagination_is_null() {
        let shaped = shape_results(client_root(json!({"searchResults": []})), &base()).unwrap();
        assert!(shaped.items.is_empty());
        assert!(shaped.pagination_info.is_null());
    }
}

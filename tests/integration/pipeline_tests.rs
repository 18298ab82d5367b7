//! Integration tests for the search and listing-detail pipelines
//!
//! These tests use wiremock to stand in for the listing site and run both
//! operations end-to-end: policy check, fetch, extraction and shaping.

use serde_json::{json, Value};
use stay_sieve::config::{Config, DetailsConfig, SiteConfig};
use stay_sieve::crawler::Coordinator;
use stay_sieve::pipeline::{DetailsPayload, ErrorPayload, ListingRef, Pipeline, SearchFilters, SearchPayload};
use stay_sieve::ROBOTS_ERROR_MESSAGE;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            ..SiteConfig::default()
        },
        details: DetailsConfig {
            max_listings: 5,
            max_concurrent_fetches: 2,
        },
        ..Config::default()
    }
}

/// Wraps a client data root the way listing pages embed it
fn page_with_state(root: Value) -> String {
    let state = json!({"niobeMinimalClientData": [["StaysQuery", root]]});
    format!(
        r#"<html><head><title>Stays</title></head><body>
        <div id="site-content"></div>
        <script id="data-deferred-state-0" data-deferred-state-0="true" type="application/json">{}</script>
        </body></html>"#,
        state
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

async fn mount_robots(server: &MockServer, robots: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(robots.to_string()))
        .mount(server)
        .await;
}

/// Builds a pipeline against the mock server and loads its policy
async fn create_pipeline(server: &MockServer) -> Pipeline {
    let pipeline = Pipeline::new(&create_test_config(&server.uri())).expect("Failed to build pipeline");
    pipeline.load_policy().await;
    pipeline
}

fn search_page() -> String {
    page_with_state(json!({
        "data": {"presentation": {"staysSearch": {"results": {
            "__typename": "StaysSearchResults",
            "searchResults": [
                {
                    "__typename": "StaySearchResult",
                    "listing": {"id": "1", "name": "Canal loft", "badges": null},
                    "avgRatingA11yLabel": "4.9 out of 5",
                    "trackingData": {"ignored": true}
                },
                {
                    "listing": {"id": "2", "name": "Garden studio"},
                    "avgRatingA11yLabel": "4.7 out of 5"
                }
            ],
            "paginationInfo": {"nextPageCursor": "next-1"}
        }}}}
    }))
}

fn detail_page() -> String {
    page_with_state(json!({
        "data": {"presentation": {"stayProductDetailPage": {"sections": {"sections": [
            {
                "sectionId": "DESCRIPTION_DEFAULT",
                "section": {
                    "__typename": "PdpDescriptionSection",
                    "htmlDescription": {"htmlText": "Bright and quiet", "recommendedNumberOfLines": 6}
                }
            },
            {
                "sectionId": "REVIEWS_DEFAULT",
                "section": {"overallCount": 210}
            }
        ]}}}}
    }))
}

#[tokio::test]
async fn test_search_disallowed_by_policy() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /s/\n").await;

    // The search page must never be requested
    Mock::given(method("GET"))
        .and(path("/s/Paris/homes"))
        .respond_with(html(search_page()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let pipeline = create_pipeline(&mock_server).await;
    let envelope = pipeline.search(&SearchFilters::new("Paris")).await;

    assert!(envelope.is_error);
    let error: ErrorPayload = envelope.payload().unwrap();
    assert_eq!(error.error, ROBOTS_ERROR_MESSAGE);
    assert!(error.url.contains("/s/Paris/homes"));
}

#[tokio::test]
async fn test_search_override_bypasses_policy() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /s/\n").await;

    Mock::given(method("GET"))
        .and(path("/s/Paris/homes"))
        .respond_with(html(search_page()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pipeline = create_pipeline(&mock_server).await;
    let mut filters = SearchFilters::new("Paris");
    filters.ignore_robots_text = true;

    let envelope = pipeline.search(&filters).await;
    assert!(!envelope.is_error);

    let payload: SearchPayload = envelope.payload().unwrap();
    assert_eq!(payload.search_results.len(), 2);
    assert_eq!(
        payload.search_results[0],
        json!({
            "url": format!("{}/rooms/1", mock_server.uri()),
            "listing": {"id": "1", "name": "Canal loft"},
            "avgRatingA11yLabel": "4.9 out of 5"
        })
    );
    assert_eq!(payload.pagination_info, json!({"nextPageCursor": "next-1"}));
}

#[tokio::test]
async fn test_search_url_carries_filters() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /\n").await;

    Mock::given(method("GET"))
        .and(path("/s/Lisbon/homes"))
        .respond_with(html(search_page()))
        .mount(&mock_server)
        .await;

    let pipeline = create_pipeline(&mock_server).await;
    let mut filters = SearchFilters::new("Lisbon");
    filters.checkin = Some("2026-11-02".to_string());
    filters.checkout = Some("2026-11-06".to_string());
    filters.guests.adults = 2;
    filters.min_price = Some(0);
    filters.max_price = Some(250);

    let envelope = pipeline.search(&filters).await;
    let payload: SearchPayload = envelope.payload().unwrap();

    assert_eq!(
        payload.search_url,
        format!(
            "{}/s/Lisbon/homes?checkin=2026-11-02&checkout=2026-11-06&adults=2&children=0&infants=0&pets=0&price_max=250",
            mock_server.uri()
        )
    );
}

#[tokio::test]
async fn test_search_without_embedded_state_degrades() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /\n").await;

    Mock::given(method("GET"))
        .and(path("/s/Paris/homes"))
        .respond_with(html("<html><body><p>Nothing here</p></body></html>".to_string()))
        .mount(&mock_server)
        .await;

    let pipeline = create_pipeline(&mock_server).await;
    let envelope = pipeline.search(&SearchFilters::new("Paris")).await;

    assert!(!envelope.is_error);
    let payload: SearchPayload = envelope.payload().unwrap();
    assert!(payload.search_results.is_empty());
    assert!(payload.pagination_info.is_null());
}

#[tokio::test]
async fn test_listing_details_projects_sections() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /s/\n").await;

    Mock::given(method("GET"))
        .and(path("/rooms/123"))
        .respond_with(html(detail_page()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pipeline = create_pipeline(&mock_server).await;
    let mut listing = ListingRef::new("123");
    listing.checkin = Some("2026-11-02".to_string());

    let envelope = pipeline.listing_details(&listing).await;
    assert!(!envelope.is_error);

    let payload: DetailsPayload = envelope.payload().unwrap();
    assert_eq!(
        payload.listing_url,
        format!(
            "{}/rooms/123?check_in=2026-11-02&adults=1&children=0&infants=0&pets=0",
            mock_server.uri()
        )
    );
    assert_eq!(
        payload.details,
        vec![json!({
            "id": "DESCRIPTION_DEFAULT",
            "htmlDescription": {"htmlText": "Bright and quiet"}
        })]
    );
}

#[tokio::test]
async fn test_listing_disallowed_by_policy() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /rooms\n").await;

    // The detail page must never be requested
    Mock::given(method("GET"))
        .and(path("/rooms/123"))
        .respond_with(html(detail_page()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let pipeline = create_pipeline(&mock_server).await;
    let envelope = pipeline.listing_details(&ListingRef::new("123")).await;

    assert!(envelope.is_error);
    let error: ErrorPayload = envelope.payload().unwrap();
    assert_eq!(error.error, ROBOTS_ERROR_MESSAGE);
    assert!(error.url.contains("/rooms/123"));
}

#[tokio::test]
async fn test_listing_override_bypasses_policy() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /rooms\n").await;

    Mock::given(method("GET"))
        .and(path("/rooms/123"))
        .respond_with(html(detail_page()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pipeline = create_pipeline(&mock_server).await;
    let mut listing = ListingRef::new("123");
    listing.ignore_robots_text = true;

    let envelope = pipeline.listing_details(&listing).await;
    assert!(!envelope.is_error);

    let payload: DetailsPayload = envelope.payload().unwrap();
    assert_eq!(
        payload.details,
        vec![json!({
            "id": "DESCRIPTION_DEFAULT",
            "htmlDescription": {"htmlText": "Bright and quiet"}
        })]
    );
}

#[tokio::test]
async fn test_search_with_punctuated_location() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /s/New%20York%2C\n").await;

    let pipeline = create_pipeline(&mock_server).await;
    let envelope = pipeline.search(&SearchFilters::new("New York, NY")).await;

    assert!(envelope.is_error);
    let error: ErrorPayload = envelope.payload().unwrap();
    assert!(error
        .url
        .starts_with(&format!("{}/s/New%20York%2C%20NY/homes?", mock_server.uri())));
}

#[tokio::test]
async fn test_unreachable_origin_yields_error_envelope() {
    // Nothing listens on port 1; policy loading fails open and the fetch fails
    let pipeline = Pipeline::new(&create_test_config("http://127.0.0.1:1")).unwrap();
    pipeline.load_policy().await;

    let envelope = pipeline.listing_details(&ListingRef::new("9")).await;

    assert!(envelope.is_error);
    let error: ErrorPayload = envelope.payload().unwrap();
    assert!(!error.error.is_empty());
    assert!(error.url.starts_with("http://127.0.0.1:1/rooms/9"));
}

#[tokio::test]
async fn test_missing_policy_allows_everything() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rooms/123"))
        .respond_with(html(detail_page()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pipeline = create_pipeline(&mock_server).await;
    let envelope = pipeline.listing_details(&ListingRef::new("123")).await;

    assert!(!envelope.is_error);
}

#[tokio::test]
async fn test_coordinator_expands_search_results() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /\n").await;

    Mock::given(method("GET"))
        .and(path("/s/Paris/homes"))
        .respond_with(html(search_page()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rooms/1"))
        .respond_with(html(detail_page()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rooms/2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let pipeline = create_pipeline(&mock_server).await;
    let coordinator = Coordinator::new(pipeline, &config.details);

    let report = coordinator.run(&SearchFilters::new("Paris")).await.unwrap();

    assert_eq!(report.location, "Paris");
    assert_eq!(report.listings.len(), 2);
    assert_eq!(report.listings[0].url, format!("{}/rooms/1", mock_server.uri()));
    assert_eq!(
        report.listings[0].details,
        Some(vec![json!({
            "id": "DESCRIPTION_DEFAULT",
            "htmlDescription": {"htmlText": "Bright and quiet"}
        })])
    );
    // A 500 page has no embedded state, so the lookup succeeds with no sections
    assert_eq!(report.listings[1].details, Some(Vec::new()));
}

#[tokio::test]
async fn test_coordinator_respects_listing_limit() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /\n").await;

    Mock::given(method("GET"))
        .and(path("/s/Paris/homes"))
        .respond_with(html(search_page()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rooms/1"))
        .respond_with(html(detail_page()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rooms/2"))
        .respond_with(html(detail_page()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let pipeline = create_pipeline(&mock_server).await;
    let details = DetailsConfig {
        max_listings: 1,
        max_concurrent_fetches: 1,
    };

    let report = Coordinator::new(pipeline, &details)
        .run(&SearchFilters::new("Paris"))
        .await
        .unwrap();

    assert_eq!(report.listings.len(), 1);
    assert!(report.listings[0].details.is_some());
}

#[tokio::test]
async fn test_coordinator_fails_when_search_is_disallowed() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /\n").await;

    let pipeline = create_pipeline(&mock_server).await;
    let details = DetailsConfig {
        max_listings: 3,
        max_concurrent_fetches: 1,
    };

    let result = Coordinator::new(pipeline, &details)
        .run(&SearchFilters::new("Paris"))
        .await;

    assert!(result.is_err());
}

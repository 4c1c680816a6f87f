//! Integration tests for the places client (wiremock-based)

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_places::{GooglePlacesClient, PlacesClient, PlacesConfig, PlacesError};

fn config_for_mock(base_url: &str) -> PlacesConfig {
    PlacesConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        cache_ttl_minutes: 0,
        ..PlacesConfig::for_testing()
    }
}

const fn sample_places_json() -> &'static str {
    r#"{
        "places": [{
            "id": "ChIJtestcafe",
            "displayName": { "text": "Test Cafe", "languageCode": "en" },
            "formattedAddress": "1 Example Rd, Singapore 123456",
            "location": { "latitude": 1.3, "longitude": 103.8 }
        }]
    }"#
}

#[tokio::test]
async fn test_geocode_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .and(header("X-Goog-Api-Key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "textQuery": "Test Cafe 1 Example Rd, Singapore 123456 Singapore",
            "maxResultCount": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_places_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = GooglePlacesClient::new(&config_for_mock(&server.uri())).unwrap();

    let hit = client
        .geocode("Test Cafe", Some("1 Example Rd, Singapore 123456"))
        .await
        .unwrap()
        .expect("candidate");

    assert_eq!(hit.display_name, "Test Cafe");
    assert!((hit.latitude - 1.3).abs() < f64::EPSILON);
    assert!((hit.longitude - 103.8).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_geocode_empty_result_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let client = GooglePlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let hit = client.geocode("Nonexistent Stall", None).await.unwrap();

    assert!(hit.is_none());
}

#[tokio::test]
async fn test_geocode_forbidden_is_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = GooglePlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.geocode("Test Cafe", None).await.unwrap_err();

    assert!(matches!(err, PlacesError::Unauthorized(_)));
    assert!(!err.is_miss());
}

#[tokio::test]
async fn test_geocode_server_error_is_retryable_miss() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = GooglePlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.geocode("Test Cafe", None).await.unwrap_err();

    assert!(err.is_retryable());
    assert!(err.is_miss());
}

#[tokio::test]
async fn test_geocode_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let client = GooglePlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.geocode("Test Cafe", None).await.unwrap_err();

    assert!(matches!(
        err,
        PlacesError::RateLimitExceeded {
            retry_after_secs: Some(7)
        }
    ));
}

#[tokio::test]
async fn test_geocode_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sample_places_json())
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = PlacesConfig {
        timeout_secs: 1,
        ..config_for_mock(&server.uri())
    };
    let client = GooglePlacesClient::new(&config).unwrap();
    let err = client.geocode("Test Cafe", None).await.unwrap_err();

    assert!(matches!(err, PlacesError::Timeout { timeout_secs: 1 }));
    assert!(err.is_miss());
}

#[tokio::test]
async fn test_geocode_cache_avoids_second_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_places_json()))
        .expect(1)
        .mount(&server)
        .await;

    let config = PlacesConfig {
        cache_ttl_minutes: 10,
        ..config_for_mock(&server.uri())
    };
    let client = GooglePlacesClient::new(&config).unwrap();

    let first = client.geocode("Test Cafe", None).await.unwrap();
    let second = client.geocode("test cafe", None).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_geocode_empty_name_rejected_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_places_json()))
        .expect(0)
        .mount(&server)
        .await;

    let client = GooglePlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.geocode("   ", Some("1 Example Rd")).await.unwrap_err();

    assert!(matches!(err, PlacesError::InvalidQuery(_)));
}

#[tokio::test]
async fn test_search_text_returns_ranked_candidates() {
    let server = MockServer::start().await;

    let body = r#"{
        "places": [
            { "id": "a", "displayName": { "text": "First" },
              "location": { "latitude": 1.30, "longitude": 103.80 } },
            { "id": "b", "displayName": { "text": "Second" },
              "location": { "latitude": 1.31, "longitude": 103.81 } }
        ]
    }"#;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .and(body_partial_json(serde_json::json!({ "maxResultCount": 5 })))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = GooglePlacesClient::new(&config_for_mock(&server.uri())).unwrap();
    let candidates = client.search_text("chicken rice", 5).await.unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].display_name, "First");
    assert_eq!(candidates[1].display_name, "Second");
}

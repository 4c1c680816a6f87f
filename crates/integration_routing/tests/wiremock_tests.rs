//! Integration tests for the routing client (wiremock-based)

use domain::value_objects::GeoLocation;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_routing::{OneMapRoutingClient, RoutingClient, RoutingConfig, RoutingError};

fn config_for_mock(base_url: &str) -> RoutingConfig {
    RoutingConfig {
        base_url: base_url.to_string(),
        token: Some("static-token".to_string()),
        ..RoutingConfig::for_testing()
    }
}

fn station() -> GeoLocation {
    GeoLocation::new(1.3, 103.8).unwrap()
}

fn cafe() -> GeoLocation {
    GeoLocation::new(1.301, 103.801).unwrap()
}

const fn sample_route_json() -> &'static str {
    r#"{
        "status_message": "Found route between points",
        "status": 0,
        "route_summary": {
            "start_point": "TEST STATION",
            "end_point": "TEST CAFE",
            "total_time": 185,
            "total_distance": 231
        }
    }"#
}

#[tokio::test]
async fn test_walking_route_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/routingsvc/route"))
        .and(query_param("start", "1.3,103.8"))
        .and(query_param("end", "1.301,103.801"))
        .and(query_param("routeType", "walk"))
        .and(header("Authorization", "static-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_route_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = OneMapRoutingClient::new(&config_for_mock(&server.uri())).unwrap();
    let summary = client.walking_route(&station(), &cafe()).await.unwrap();

    assert!((summary.distance_meters - 231.0).abs() < f64::EPSILON);
    assert!((summary.time_seconds - 185.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_walking_route_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/routingsvc/route"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = OneMapRoutingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.walking_route(&station(), &cafe()).await.unwrap_err();

    assert!(matches!(err, RoutingError::Unauthorized(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_walking_route_without_token_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_route_json()))
        .expect(0)
        .mount(&server)
        .await;

    let config = RoutingConfig {
        base_url: server.uri(),
        ..RoutingConfig::for_testing()
    };
    let client = OneMapRoutingClient::new(&config).unwrap();
    let err = client.walking_route(&station(), &cafe()).await.unwrap_err();

    assert!(matches!(err, RoutingError::Unauthorized(_)));
}

#[tokio::test]
async fn test_walking_route_no_route() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/routingsvc/route"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{ "status": 207, "status_message": "Cannot find route" }"#),
        )
        .mount(&server)
        .await;

    let client = OneMapRoutingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.walking_route(&station(), &cafe()).await.unwrap_err();

    assert!(matches!(err, RoutingError::NoRoute(_)));
}

#[tokio::test]
async fn test_walking_route_server_error_is_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/routingsvc/route"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = OneMapRoutingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.walking_route(&station(), &cafe()).await.unwrap_err();

    assert!(matches!(err, RoutingError::ServiceUnavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_walking_route_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/routingsvc/route"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sample_route_json())
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = RoutingConfig {
        timeout_secs: 1,
        ..config_for_mock(&server.uri())
    };
    let client = OneMapRoutingClient::new(&config).unwrap();
    let err = client.walking_route(&station(), &cafe()).await.unwrap_err();

    assert!(matches!(err, RoutingError::Timeout { timeout_secs: 1 }));
}

#[tokio::test]
async fn test_refresh_token_then_route_uses_new_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/post/getNewToken"))
        .and(body_json(serde_json::json!({
            "email": "test@example.com",
            "password": "secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{ "access_token": "fresh-token", "expiry_timestamp": "1893456000" }"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/public/routingsvc/route"))
        .and(header("Authorization", "fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_route_json()))
        .expect(1)
        .mount(&server)
        .await;

    let config = RoutingConfig {
        base_url: server.uri(),
        ..RoutingConfig::for_testing()
    };
    let client = OneMapRoutingClient::new(&config).unwrap();
    assert!(!client.has_token());

    client.refresh_token().await.unwrap();
    assert!(client.has_token());

    let summary = client.walking_route(&station(), &cafe()).await.unwrap();
    assert!((summary.distance_meters - 231.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_refresh_token_rejected_keeps_old_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/post/getNewToken"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = OneMapRoutingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.refresh_token().await.unwrap_err();

    assert!(matches!(err, RoutingError::Unauthorized(_)));
    assert_eq!(client.current_token().unwrap().value(), "static-token");
}

#[tokio::test]
async fn test_refresh_token_without_credentials() {
    let config = RoutingConfig {
        token: Some("static-token".to_string()),
        ..RoutingConfig::default()
    };
    let client = OneMapRoutingClient::new(&config).unwrap();
    let err = client.refresh_token().await.unwrap_err();

    assert!(matches!(err, RoutingError::ConfigurationError(_)));
}

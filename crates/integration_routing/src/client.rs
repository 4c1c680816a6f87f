//! OneMap pedestrian routing client
//!
//! Provides walking routes between coordinate pairs and access-token
//! management for the [OneMap](https://www.onemap.gov.sg) API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use domain::value_objects::GeoLocation;
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::RoutingConfig;
use crate::error::RoutingError;
use crate::models::{AccessToken, RouteSummary};

/// Trait for pedestrian routing clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Compute a walking route between two coordinates
    async fn walking_route(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteSummary, RoutingError>;

    /// Obtain a fresh access token and use it for subsequent calls
    async fn refresh_token(&self) -> Result<(), RoutingError>;

    /// Whether a token is held that is not about to expire
    fn has_token(&self) -> bool;
}

/// Tokens this close to expiry (seconds) are treated as missing
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 300;

/// OneMap routing client
#[derive(Debug)]
pub struct OneMapRoutingClient {
    client: Client,
    config: RoutingConfig,
    token: RwLock<Option<AccessToken>>,
}

impl OneMapRoutingClient {
    /// Create a new routing client
    ///
    /// A token from the configuration is used as-is until the first refresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        config
            .validate()
            .map_err(RoutingError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("station-walk/0.3")
            .build()
            .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))?;

        let token = config
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| AccessToken::new(t, None));

        Ok(Self {
            client,
            config: config.clone(),
            token: RwLock::new(token),
        })
    }

    /// Current token, if any
    #[must_use]
    pub fn current_token(&self) -> Option<AccessToken> {
        self.token.read().clone()
    }

    fn map_send_error(&self, e: &reqwest::Error) -> RoutingError {
        if e.is_timeout() {
            RoutingError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            RoutingError::ConnectionFailed(e.to_string())
        }
    }

    fn status_error(status: StatusCode) -> RoutingError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                RoutingError::Unauthorized(format!("HTTP {status}"))
            },
            StatusCode::TOO_MANY_REQUESTS => RoutingError::RateLimitExceeded,
            StatusCode::NOT_FOUND => RoutingError::NoRoute(format!("HTTP {status}")),
            s if s.is_server_error() => RoutingError::ServiceUnavailable(format!("HTTP {s}")),
            s => RoutingError::RequestFailed(format!("HTTP {s}")),
        }
    }

    /// Parse the raw route response into totals
    fn parse_route_response(body: &str) -> Result<RouteSummary, RoutingError> {
        let raw: RawRouteResponse =
            serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;

        if let Some(error) = raw.error {
            return Err(RoutingError::NoRoute(error));
        }

        if raw.status.is_some_and(|s| s != 0) {
            return Err(RoutingError::NoRoute(
                raw.status_message
                    .unwrap_or_else(|| "routing service reported failure".to_string()),
            ));
        }

        let summary = raw
            .route_summary
            .ok_or_else(|| RoutingError::NoRoute("response has no route summary".to_string()))?;

        Ok(RouteSummary {
            distance_meters: summary.total_distance,
            time_seconds: summary.total_time,
        })
    }

    /// Parse the raw token response
    fn parse_token_response(body: &str) -> Result<AccessToken, RoutingError> {
        let raw: RawTokenResponse =
            serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;

        if raw.access_token.is_empty() {
            return Err(RoutingError::Unauthorized(
                "token response has empty access_token".to_string(),
            ));
        }

        let expires_at = raw
            .expiry_timestamp
            .as_ref()
            .and_then(parse_timestamp)
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        Ok(AccessToken::new(raw.access_token, expires_at))
    }
}

/// Accept expiry timestamps sent either as numbers or numeric strings
fn parse_timestamp(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl RoutingClient for OneMapRoutingClient {
    #[instrument(skip(self), fields(origin = %origin, destination = %destination))]
    async fn walking_route(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteSummary, RoutingError> {
        let token = self
            .current_token()
            .ok_or_else(|| RoutingError::Unauthorized("no access token".to_string()))?;

        let url = format!("{}/api/public/routingsvc/route", self.config.base_url);
        let params = [
            (
                "start",
                format!("{},{}", origin.latitude(), origin.longitude()),
            ),
            (
                "end",
                format!("{},{}", destination.latitude(), destination.longitude()),
            ),
            ("routeType", self.config.route_type.clone()),
        ];

        debug!(?url, "Requesting walking route");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, token.value())
            .query(&params)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let summary = Self::parse_route_response(&body)?;
        debug!(
            distance_m = summary.distance_meters,
            time_s = summary.time_seconds,
            "Walking route found"
        );
        Ok(summary)
    }

    #[instrument(skip(self))]
    async fn refresh_token(&self) -> Result<(), RoutingError> {
        if !self.config.has_credentials() {
            return Err(RoutingError::ConfigurationError(
                "email and password are required to refresh the token".to_string(),
            ));
        }

        let url = format!("{}/api/auth/post/getNewToken", self.config.base_url);
        let body = TokenRequest {
            email: &self.config.email,
            password: &self.config.password,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let token = Self::parse_token_response(&body)?;
        info!(expires_at = ?token.expires_at(), "Routing token refreshed");
        *self.token.write() = Some(token);
        Ok(())
    }

    fn has_token(&self) -> bool {
        let margin = TimeDelta::seconds(TOKEN_EXPIRY_MARGIN_SECS);
        self.token
            .read()
            .as_ref()
            .is_some_and(|t| !t.expires_within(Utc::now(), margin))
    }
}

// --- Raw API request/response types ---

#[derive(Serialize)]
struct TokenRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct RawTokenResponse {
    #[serde(default)]
    access_token: String,
    expiry_timestamp: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawRouteResponse {
    status: Option<i64>,
    status_message: Option<String>,
    error: Option<String>,
    route_summary: Option<RawRouteSummary>,
}

#[derive(Debug, Deserialize)]
struct RawRouteSummary {
    total_time: f64,
    total_distance: f64,
}

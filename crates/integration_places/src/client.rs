//! Google Places text-search client
//!
//! Issues one `places:searchText` request per query, asking for a single
//! ranked candidate. Hits are cached by normalized query; misses are not.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::PlacesConfig;
use crate::error::PlacesError;
use crate::models::PlaceCandidate;

/// Response fields requested from the API
const FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.location";

/// Trait for text-search geocoding clients
#[async_trait]
pub trait PlacesClient: Send + Sync {
    /// Run a raw text search, returning at most `max_results` ranked candidates
    async fn search_text(
        &self,
        query: &str,
        max_results: u8,
    ) -> Result<Vec<PlaceCandidate>, PlacesError>;

    /// Resolve a place name (plus optional address) to its best candidate
    ///
    /// `Ok(None)` means the provider had no candidate for the query.
    async fn geocode(
        &self,
        name: &str,
        address: Option<&str>,
    ) -> Result<Option<PlaceCandidate>, PlacesError>;
}

/// Build the free-text query `"<name> <address> <country-hint>"`
///
/// Blank parts are skipped and inner whitespace is collapsed.
#[must_use]
pub fn build_query(name: &str, address: Option<&str>, country_hint: &str) -> String {
    [Some(name), address, Some(country_hint)]
        .into_iter()
        .flatten()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Google Places API (New) client with result caching
#[derive(Debug)]
pub struct GooglePlacesClient {
    client: Client,
    config: PlacesConfig,
    cache: Option<Cache<String, PlaceCandidate>>,
}

impl GooglePlacesClient {
    /// Create a new places client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &PlacesConfig) -> Result<Self, PlacesError> {
        config
            .validate()
            .map_err(PlacesError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("station-walk/0.3")
            .build()
            .map_err(|e| PlacesError::ConnectionFailed(e.to_string()))?;

        let cache = config.caching_enabled().then(|| {
            Cache::builder()
                .max_capacity(10_000)
                .time_to_live(Duration::from_secs(config.cache_ttl_minutes * 60))
                .build()
        });

        Ok(Self {
            client,
            config: config.clone(),
            cache,
        })
    }

    /// Parse the raw JSON search response into candidates
    ///
    /// Candidates without a location are dropped; ranking order is kept.
    fn parse_search_response(body: &str) -> Result<Vec<PlaceCandidate>, PlacesError> {
        let raw: RawSearchResponse =
            serde_json::from_str(body).map_err(|e| PlacesError::ParseError(e.to_string()))?;

        Ok(raw
            .places
            .into_iter()
            .filter_map(Self::convert_place)
            .collect())
    }

    fn convert_place(raw: RawPlace) -> Option<PlaceCandidate> {
        let location = raw.location?;
        Some(PlaceCandidate {
            id: raw.id.unwrap_or_default(),
            display_name: raw.display_name.map(|n| n.text).unwrap_or_default(),
            formatted_address: raw.formatted_address,
            latitude: location.latitude,
            longitude: location.longitude,
        })
    }

    /// Map a non-success status to a typed error
    fn status_error(response: &reqwest::Response) -> PlacesError {
        let status = response.status();
        match status {
            StatusCode::TOO_MANY_REQUESTS => PlacesError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                PlacesError::Unauthorized(format!("HTTP {status}"))
            },
            s if s.is_server_error() => PlacesError::ServiceUnavailable(format!("HTTP {s}")),
            s => PlacesError::RequestFailed(format!("HTTP {s}")),
        }
    }
}

#[async_trait]
impl PlacesClient for GooglePlacesClient {
    #[instrument(skip(self))]
    async fn search_text(
        &self,
        query: &str,
        max_results: u8,
    ) -> Result<Vec<PlaceCandidate>, PlacesError> {
        if query.trim().is_empty() {
            return Err(PlacesError::InvalidQuery(
                "Search query must not be empty".to_string(),
            ));
        }

        let url = format!("{}/v1/places:searchText", self.config.base_url);
        let body = SearchTextRequest {
            text_query: query,
            max_result_count: max_results.max(1),
            language_code: &self.config.language_code,
        };

        debug!(?url, "Searching places");

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", &self.config.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PlacesError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    PlacesError::ConnectionFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::status_error(&response));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                PlacesError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                }
            } else {
                PlacesError::ParseError(e.to_string())
            }
        })?;

        let candidates = Self::parse_search_response(&body)?;
        debug!(count = candidates.len(), "Places found");
        Ok(candidates)
    }

    #[instrument(skip(self))]
    async fn geocode(
        &self,
        name: &str,
        address: Option<&str>,
    ) -> Result<Option<PlaceCandidate>, PlacesError> {
        if name.trim().is_empty() {
            return Err(PlacesError::InvalidQuery(
                "Place name must not be empty".to_string(),
            ));
        }

        let query = build_query(name, address, &self.config.country_hint);
        let cache_key = query.to_lowercase();

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&cache_key).await {
                debug!(%query, "Geocoding cache hit");
                return Ok(Some(hit));
            }
        }

        let best = self.search_text(&query, 1).await?.into_iter().next();

        match &best {
            Some(candidate) => {
                debug!(
                    %query,
                    display_name = %candidate.display_name,
                    lat = candidate.latitude,
                    lon = candidate.longitude,
                    "Geocoded place"
                );
                if let Some(cache) = &self.cache {
                    cache.insert(cache_key, candidate.clone()).await;
                }
            },
            None => warn!(%query, "No place candidates"),
        }

        Ok(best)
    }
}

// --- Raw API request/response types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchTextRequest<'a> {
    text_query: &'a str,
    max_result_count: u8,
    language_code: &'a str,
}

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    places: Vec<RawPlace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlace {
    id: Option<String>,
    display_name: Option<RawLocalizedText>,
    formatted_address: Option<String>,
    location: Option<RawLatLng>,
}

#[derive(Debug, Deserialize)]
struct RawLocalizedText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct RawLatLng {
    latitude: f64,
    longitude: f64,
}

//! Geocoder used when no Places key is configured
//!
//! Items that carry a coordinate never reach the geocoder, so the rest of
//! the pipeline keeps working. A lookup fails with a configuration error
//! naming the missing setting.

use application::{
    ApplicationError,
    ports::{GeocodeQuery, GeocodedPlace, GeocoderPort},
};
use async_trait::async_trait;
use tracing::warn;

/// Setting that enables geocoding
pub const PLACES_API_KEY_ENV: &str = "STATION_WALK_PLACES__API_KEY";

/// Geocoder that rejects every lookup
#[derive(Debug, Clone)]
pub struct UnconfiguredGeocoder {
    reason: String,
}

impl UnconfiguredGeocoder {
    /// Create the geocoder, keeping why the real one could not be built
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl GeocoderPort for UnconfiguredGeocoder {
    async fn geocode(&self, query: &GeocodeQuery) -> Result<Option<GeocodedPlace>, ApplicationError> {
        warn!(name = %query.name, "Geocoding requested but not configured");
        Err(ApplicationError::Configuration(format!(
            "Geocoding is not configured (set {PLACES_API_KEY_ENV}): {}",
            self.reason
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_names_the_missing_setting() {
        let geocoder = UnconfiguredGeocoder::new("places.api_key is not set");
        let err = geocoder
            .geocode(&GeocodeQuery::new("Test Cafe"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Configuration(_)));
        assert!(!err.is_retryable());
        let message = err.to_string();
        assert!(message.contains(PLACES_API_KEY_ENV));
        assert!(message.contains("places.api_key is not set"));
    }
}

//! Geocoder adapter - Implements GeocoderPort using integration_places

use std::sync::Arc;

use application::ApplicationError;
use application::ports::{GeocodeQuery, GeocodedPlace, GeocoderPort};
use async_trait::async_trait;
use integration_places::{GooglePlacesClient, PlaceCandidate, PlacesClient, PlacesConfig, PlacesError};
use tracing::{debug, error, instrument, warn};

use crate::retry::{RetryConfig, with_retry};

/// Adapter for text-search geocoding via Google Places
pub struct PlacesGeocoderAdapter {
    client: Arc<dyn PlacesClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for PlacesGeocoderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesGeocoderAdapter")
            .field("client", &"<PlacesClient>")
            .field("retry", &self.retry)
            .finish()
    }
}

impl PlacesGeocoderAdapter {
    /// Create an adapter backed by the Google Places API
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the client cannot be built.
    pub fn new(config: &PlacesConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let client = GooglePlacesClient::new(config).map_err(Self::map_error)?;
        Ok(Self::with_client(Arc::new(client), retry))
    }

    /// Create an adapter around an existing client
    #[must_use]
    pub fn with_client(client: Arc<dyn PlacesClient>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Map a places error that is not a plain miss
    fn map_error(err: PlacesError) -> ApplicationError {
        match err {
            PlacesError::ConfigurationError(e) => {
                ApplicationError::Configuration(format!("Places: {e}"))
            },
            PlacesError::InvalidQuery(e) => ApplicationError::InvalidInput(e),
            PlacesError::RateLimitExceeded { .. } => ApplicationError::RateLimited,
            other => ApplicationError::ExternalService(format!("Places: {other}")),
        }
    }

    fn to_place(candidate: PlaceCandidate) -> Option<GeocodedPlace> {
        match candidate.location() {
            Ok(location) => Some(GeocodedPlace {
                location,
                display_name: candidate.display_name,
                provider_id: Some(candidate.id),
            }),
            Err(e) => {
                warn!(
                    provider_id = %candidate.id,
                    lat = candidate.latitude,
                    lon = candidate.longitude,
                    error = %e,
                    "Discarding candidate with unusable coordinates"
                );
                None
            },
        }
    }
}

#[async_trait]
impl GeocoderPort for PlacesGeocoderAdapter {
    #[instrument(skip(self, query), fields(name = %query.name))]
    async fn geocode(&self, query: &GeocodeQuery) -> Result<Option<GeocodedPlace>, ApplicationError> {
        let client = Arc::clone(&self.client);
        let outcome = with_retry(&self.retry, "geocode", || {
            let client = Arc::clone(&client);
            async move { client.geocode(&query.name, query.address.as_deref()).await }
        })
        .await;

        match outcome.result {
            Ok(Some(candidate)) => Ok(Self::to_place(candidate)),
            Ok(None) => {
                debug!("No geocoding candidate");
                Ok(None)
            },
            Err(PlacesError::Unauthorized(status)) => {
                error!(%status, "Places rejected the API key, treating as not found");
                Ok(None)
            },
            Err(e) if e.is_miss() => {
                let elapsed_ms =
                    u64::try_from(outcome.total_duration.as_millis()).unwrap_or(u64::MAX);
                warn!(
                    error = %e,
                    attempts = outcome.attempts,
                    elapsed_ms,
                    "Geocoding failed, treating as not found"
                );
                Ok(None)
            },
            Err(e) => Err(Self::map_error(e)),
        }
    }
}

//! Routing adapter - Implements RoutingPort using integration_routing

use std::sync::Arc;

use application::ApplicationError;
use application::ports::{RouteMeasurement, RoutingPort};
use async_trait::async_trait;
use domain::value_objects::GeoLocation;
use integration_routing::{OneMapRoutingClient, RoutingClient, RoutingConfig, RoutingError};
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, with_retry};

/// Adapter for pedestrian routing via OneMap
///
/// Obtains a token on first use when none was configured.
pub struct OneMapRoutingAdapter {
    client: Arc<dyn RoutingClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for OneMapRoutingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneMapRoutingAdapter")
            .field("client", &"<RoutingClient>")
            .field("has_token", &self.client.has_token())
            .field("retry", &self.retry)
            .finish()
    }
}

impl OneMapRoutingAdapter {
    /// Create an adapter backed by the OneMap API
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the client cannot be built.
    pub fn new(config: &RoutingConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let client = OneMapRoutingClient::new(config).map_err(Self::map_error)?;
        Ok(Self::with_client(Arc::new(client), retry))
    }

    /// Create an adapter around an existing client
    #[must_use]
    pub fn with_client(client: Arc<dyn RoutingClient>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Map integration routing error to application error
    fn map_error(err: RoutingError) -> ApplicationError {
        match err {
            RoutingError::Unauthorized(e) | RoutingError::ConfigurationError(e) => {
                ApplicationError::Configuration(format!("Routing: {e}"))
            },
            RoutingError::RateLimitExceeded => ApplicationError::RateLimited,
            other => ApplicationError::ExternalService(format!("Routing: {other}")),
        }
    }

    async fn refresh(&self) -> Result<(), ApplicationError> {
        let client = Arc::clone(&self.client);
        with_retry(&self.retry, "routing token", || {
            let client = Arc::clone(&client);
            async move { client.refresh_token().await }
        })
        .await
        .into_result()
        .map_err(Self::map_error)
    }
}

#[async_trait]
impl RoutingPort for OneMapRoutingAdapter {
    #[instrument(skip(self), fields(origin = %origin, destination = %destination))]
    async fn walking_route(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteMeasurement, ApplicationError> {
        if !self.client.has_token() {
            debug!("No usable routing token, requesting one");
            self.refresh().await?;
        }

        let client = Arc::clone(&self.client);
        let summary = with_retry(&self.retry, "walking route", || {
            let client = Arc::clone(&client);
            async move { client.walking_route(origin, destination).await }
        })
        .await
        .into_result()
        .map_err(Self::map_error)?;

        Ok(RouteMeasurement {
            distance_meters: summary.distance_meters,
            time_seconds: summary.time_seconds,
        })
    }

    #[instrument(skip(self))]
    async fn refresh_credentials(&self) -> Result<(), ApplicationError> {
        self.refresh().await
    }
}

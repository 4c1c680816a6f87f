//! Walking route estimation with a geometric fallback
//!
//! Prefers a routing service. Any routing failure, or a result that is not
//! finite and non-negative, falls back to the haversine detour estimate,
//! which never fails.

use std::sync::Arc;

use domain::entities::WalkingRoute;
use domain::value_objects::GeoLocation;
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::RoutingPort;

/// Route estimator with an optional routing service
#[derive(Clone, Default)]
pub struct RouteEstimator {
    routing: Option<Arc<dyn RoutingPort>>,
}

impl std::fmt::Debug for RouteEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEstimator")
            .field("routing", &self.routing.is_some())
            .finish()
    }
}

impl RouteEstimator {
    /// Estimator that always uses the geometric fallback
    #[must_use]
    pub const fn estimate_only() -> Self {
        Self { routing: None }
    }

    /// Estimator backed by a routing service
    #[must_use]
    pub fn with_routing(routing: Arc<dyn RoutingPort>) -> Self {
        Self {
            routing: Some(routing),
        }
    }

    /// Whether a routing service is configured
    #[must_use]
    pub const fn has_routing(&self) -> bool {
        self.routing.is_some()
    }

    /// Walking distance and time from `origin` to `destination`
    #[instrument(skip(self), fields(origin = %origin, destination = %destination))]
    pub async fn estimate(&self, origin: &GeoLocation, destination: &GeoLocation) -> WalkingRoute {
        let Some(routing) = &self.routing else {
            return WalkingRoute::estimated(origin, destination);
        };

        match routing.walking_route(origin, destination).await {
            Ok(measurement) => {
                match WalkingRoute::routed(measurement.distance_meters, measurement.time_seconds) {
                    Ok(route) => {
                        debug!(
                            distance_m = route.distance_meters(),
                            time_min = route.time_minutes(),
                            "Routed walking distance"
                        );
                        route
                    },
                    Err(e) => {
                        warn!(error = %e, "Routing returned unusable figures, using estimate");
                        WalkingRoute::estimated(origin, destination)
                    },
                }
            },
            Err(e) => {
                warn!(error = %e, "Routing unavailable, using estimate");
                WalkingRoute::estimated(origin, destination)
            },
        }
    }

    /// Renew routing credentials; a no-op without a routing service
    ///
    /// # Errors
    ///
    /// Returns the routing service's error when renewal fails.
    pub async fn refresh_credentials(&self) -> Result<(), ApplicationError> {
        match &self.routing {
            Some(routing) => routing.refresh_credentials().await,
            None => Ok(()),
        }
    }
}

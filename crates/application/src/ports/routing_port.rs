//! Pedestrian routing port

use async_trait::async_trait;
use domain::value_objects::GeoLocation;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Raw totals reported by a routing service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteMeasurement {
    /// Path length in meters
    pub distance_meters: f64,
    /// Walking time in seconds
    pub time_seconds: f64,
}

/// Port for pedestrian routing services
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// Walking route from `origin` to `destination`
    async fn walking_route(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteMeasurement, ApplicationError>;

    /// Renew the service credentials ahead of expiry
    async fn refresh_credentials(&self) -> Result<(), ApplicationError>;
}

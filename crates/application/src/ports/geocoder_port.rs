//! Geocoding port
//!
//! Turns a free-text place description into a coordinate. Adapters in the
//! infrastructure layer implement this port on top of a text-search API.

use async_trait::async_trait;
use domain::entities::PointOfInterest;
use domain::value_objects::GeoLocation;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// What to look up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeQuery {
    /// Place name, never blank
    pub name: String,
    /// Optional free-text address
    pub address: Option<String>,
}

impl GeocodeQuery {
    /// Create a query for a bare name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
        }
    }

    /// Attach an address
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

impl From<&PointOfInterest> for GeocodeQuery {
    fn from(poi: &PointOfInterest) -> Self {
        let query = Self::new(poi.name.trim());
        match poi.trimmed_address() {
            Some(address) => query.with_address(address),
            None => query,
        }
    }
}

/// A successful geocoding hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPlace {
    /// Coordinate of the best candidate
    pub location: GeoLocation,
    /// Canonical name reported by the provider
    pub display_name: String,
    /// Provider-side place identifier, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
}

/// Port for text-search geocoding
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocoderPort: Send + Sync {
    /// Resolve a place description to its best candidate
    ///
    /// `Ok(None)` means not found: no candidates, a non-success response or
    /// a timeout. `Err` is reserved for malformed queries, configuration
    /// problems and network faults that outlived retries.
    async fn geocode(
        &self,
        query: &GeocodeQuery,
    ) -> Result<Option<GeocodedPlace>, ApplicationError>;
}

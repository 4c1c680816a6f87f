//! Places data models

use domain::value_objects::{GeoLocation, InvalidCoordinates};
use serde::{Deserialize, Serialize};

/// A ranked text-search candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Provider place identifier
    pub id: String,
    /// Canonical display name
    pub display_name: String,
    /// Formatted address, when returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl PlaceCandidate {
    /// Validated coordinate of the candidate
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if the provider sent an out-of-range pair.
    pub fn location(&self) -> Result<GeoLocation, InvalidCoordinates> {
        GeoLocation::new(self.latitude, self.longitude)
    }
}

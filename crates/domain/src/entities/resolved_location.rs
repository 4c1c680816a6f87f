//! Resolved location entity - Output record of the resolution pipeline

use serde::{Deserialize, Serialize};

use super::{PointOfInterest, WalkingRoute};
use crate::value_objects::{DistanceSource, GeoLocation, StationId};

/// A point of interest anchored to its nearest station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// Identifier of the source point of interest
    pub poi_id: String,
    /// Name of the source point of interest
    pub poi_name: String,
    /// Resolved coordinate
    pub location: GeoLocation,
    /// Nearest station
    pub station_id: StationId,
    /// Walking distance between station and point, meters
    pub walking_distance_meters: u32,
    /// Walking time between station and point, minutes
    pub walking_time_minutes: u32,
    /// Whether the distance was routed or estimated
    pub source: DistanceSource,
    /// Canonical name reported by the geocoding provider, if it was consulted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
}

impl ResolvedLocation {
    /// Assemble the record from the outputs of each pipeline stage
    #[must_use]
    pub fn new(
        poi: &PointOfInterest,
        location: GeoLocation,
        station_id: StationId,
        route: WalkingRoute,
        provider_name: Option<String>,
    ) -> Self {
        Self {
            poi_id: poi.id.clone(),
            poi_name: poi.name.clone(),
            location,
            station_id,
            walking_distance_meters: route.distance_meters(),
            walking_time_minutes: route.time_minutes(),
            source: route.source(),
            provider_name,
        }
    }

    /// Short human readable summary, e.g. `"204m / 3min to test-station (estimated)"`
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}m / {}min to {} ({})",
            self.walking_distance_meters, self.walking_time_minutes, self.station_id, self.source
        )
    }
}

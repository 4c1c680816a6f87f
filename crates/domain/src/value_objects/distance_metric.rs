//! Distance metrics used for nearest-station ranking

use std::fmt;

use serde::{Deserialize, Serialize};

use super::GeoLocation;

/// How the distance between a point and a station is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Great-circle distance in meters
    #[default]
    Haversine,
    /// Euclidean distance on raw degrees; ranking pre-filter only, never persisted
    PlanarDegrees,
}

impl DistanceMetric {
    /// Measure the distance between two locations in this metric's unit
    #[must_use]
    pub fn measure(self, a: &GeoLocation, b: &GeoLocation) -> f64 {
        match self {
            Self::Haversine => a.distance_meters(b),
            Self::PlanarDegrees => a.planar_degrees(b),
        }
    }

    /// Unit label of values produced by [`Self::measure`]
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Haversine => "m",
            Self::PlanarDegrees => "deg",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Haversine => write!(f, "haversine"),
            Self::PlanarDegrees => write!(f, "planar_degrees"),
        }
    }
}

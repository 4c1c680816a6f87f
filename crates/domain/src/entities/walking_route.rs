//! Walking route entity - Distance and time between a station and a point

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{DistanceSource, GeoLocation};

/// Pedestrian paths are longer than straight lines by roughly this factor
pub const DETOUR_FACTOR: f64 = 1.3;

/// Average walking pace (about 5 km/h)
pub const WALKING_SPEED_METERS_PER_MINUTE: f64 = 80.0;

/// A walking distance/time pair with its provenance
///
/// Estimated routes always satisfy
/// `time_minutes == round(distance_meters / 80)`; routed ones carry whatever
/// the routing service reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkingRoute {
    distance_meters: u32,
    time_minutes: u32,
    source: DistanceSource,
}

impl WalkingRoute {
    /// Geometric estimate between two coordinates
    ///
    /// Straight-line haversine distance inflated by [`DETOUR_FACTOR`].
    #[must_use]
    pub fn estimated(origin: &GeoLocation, destination: &GeoLocation) -> Self {
        Self::from_straight_line(origin.distance_meters(destination))
    }

    /// Geometric estimate from an already computed straight-line distance
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_straight_line(straight_meters: f64) -> Self {
        // `as` saturates, so NaN becomes 0 instead of panicking
        let distance_meters = (straight_meters.max(0.0) * DETOUR_FACTOR).round() as u32;
        Self {
            distance_meters,
            time_minutes: Self::minutes_for_distance(distance_meters),
            source: DistanceSource::Estimated,
        }
    }

    /// Route figures reported by a routing service
    ///
    /// # Errors
    ///
    /// Returns `InvalidRoute` if either figure is negative or not finite.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn routed(distance_meters: f64, time_seconds: f64) -> Result<Self, DomainError> {
        if !distance_meters.is_finite() || distance_meters < 0.0 {
            return Err(DomainError::InvalidRoute(format!(
                "distance must be finite and non-negative, got {distance_meters}"
            )));
        }
        if !time_seconds.is_finite() || time_seconds < 0.0 {
            return Err(DomainError::InvalidRoute(format!(
                "time must be finite and non-negative, got {time_seconds}"
            )));
        }

        Ok(Self {
            distance_meters: distance_meters.round() as u32,
            time_minutes: (time_seconds / 60.0).round() as u32,
            source: DistanceSource::Routed,
        })
    }

    /// Walking time in whole minutes for a distance at the assumed pace
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn minutes_for_distance(distance_meters: u32) -> u32 {
        (f64::from(distance_meters) / WALKING_SPEED_METERS_PER_MINUTE).round() as u32
    }

    /// Walking distance in meters
    #[must_use]
    pub const fn distance_meters(&self) -> u32 {
        self.distance_meters
    }

    /// Walking time in minutes
    #[must_use]
    pub const fn time_minutes(&self) -> u32 {
        self.time_minutes
    }

    /// Which stage produced the figures
    #[must_use]
    pub const fn source(&self) -> DistanceSource {
        self.source
    }
}

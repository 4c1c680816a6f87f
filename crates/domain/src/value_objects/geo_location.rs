//! WGS84 coordinate pair and the distance measures over it

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean earth radius used by the haversine formula
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Latitude/longitude in decimal degrees, always within range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    latitude: f64,
    longitude: f64,
}

/// Rejected coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("coordinate ({latitude}, {longitude}) is out of range")]
pub struct InvalidCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// `sin²(θ/2)`
fn hav(theta: f64) -> f64 {
    (theta / 2.0).sin().powi(2)
}

impl GeoLocation {
    /// Build a coordinate, rejecting NaN and anything outside ±90 / ±180
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` carrying the rejected pair.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        let lat_ok = (-90.0..=90.0).contains(&latitude);
        let lon_ok = (-180.0..=180.0).contains(&longitude);
        if lat_ok && lon_ok {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(InvalidCoordinates {
                latitude,
                longitude,
            })
        }
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Haversine great-circle distance in meters
    #[must_use]
    pub fn distance_meters(&self, other: &Self) -> f64 {
        let (phi1, phi2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let d_phi = phi2 - phi1;
        let d_lambda = (other.longitude - self.longitude).to_radians();

        let h = (phi1.cos() * phi2.cos()).mul_add(hav(d_lambda), hav(d_phi));
        2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
    }

    /// Euclidean distance on raw degrees
    ///
    /// Only meaningful for ranking nearby candidates. The value has no unit
    /// and distorts east-west separation away from the equator.
    #[must_use]
    pub fn planar_degrees(&self, other: &Self) -> f64 {
        (other.latitude - self.latitude).hypot(other.longitude - self.longitude)
    }

    /// Raffles Place, used as a fixture origin
    #[must_use]
    pub const fn singapore() -> Self {
        Self {
            latitude: 1.2840,
            longitude: 103.8514,
        }
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

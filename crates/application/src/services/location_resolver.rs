//! Point-of-interest resolution: geocode, locate, route
//!
//! Lookup misses come back as [`Resolution::Flagged`]; only malformed input
//! and infrastructure faults are returned as errors. No retries happen here.

use std::fmt;
use std::sync::Arc;

use domain::entities::{PointOfInterest, ResolvedLocation};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::ApplicationError;
use crate::ports::{GeocodeQuery, GeocoderPort};
use crate::services::route_estimator::RouteEstimator;
use crate::services::station_locator::StationLocator;

/// Why a point of interest could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagReason {
    /// The geocoder had no candidate
    CouldNotGeocode,
    /// No station with a coordinate was available
    NoStationFound,
}

impl FlagReason {
    /// Human readable reason
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CouldNotGeocode => "could not geocode",
            Self::NoStationFound => "no station found",
        }
    }
}

impl fmt::Display for FlagReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving one point of interest
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Fully resolved record, ready to persist
    Resolved(ResolvedLocation),
    /// Item needs manual attention
    Flagged {
        /// What went wrong
        reason: FlagReason,
    },
}

impl Resolution {
    /// Resolved record, if any
    #[must_use]
    pub const fn as_resolved(&self) -> Option<&ResolvedLocation> {
        match self {
            Self::Resolved(location) => Some(location),
            Self::Flagged { .. } => None,
        }
    }

    /// Whether the item was flagged
    #[must_use]
    pub const fn is_flagged(&self) -> bool {
        matches!(self, Self::Flagged { .. })
    }
}

/// Resolves points of interest to their nearest station and walking route
pub struct LocationResolver {
    geocoder: Arc<dyn GeocoderPort>,
    locator: StationLocator,
    estimator: RouteEstimator,
}

impl fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationResolver")
            .field("geocoder", &"<GeocoderPort>")
            .field("stations", &self.locator.stations().len())
            .field("estimator", &self.estimator)
            .finish()
    }
}

impl LocationResolver {
    /// Create a resolver
    #[must_use]
    pub const fn new(
        geocoder: Arc<dyn GeocoderPort>,
        locator: StationLocator,
        estimator: RouteEstimator,
    ) -> Self {
        Self {
            geocoder,
            locator,
            estimator,
        }
    }

    /// Station locator in use
    #[must_use]
    pub const fn locator(&self) -> &StationLocator {
        &self.locator
    }

    /// Renew routing credentials
    ///
    /// # Errors
    ///
    /// Returns the routing service's error when renewal fails.
    pub async fn refresh_credentials(&self) -> Result<(), ApplicationError> {
        self.estimator.refresh_credentials().await
    }

    /// Resolve one point of interest
    ///
    /// A known coordinate skips the geocoder. The route is measured from the
    /// station to the point.
    ///
    /// # Errors
    ///
    /// Returns a domain error for a blank id or name, and propagates geocoder
    /// errors that are not plain misses.
    #[instrument(skip(self, poi), fields(poi_id = %poi.id, name = %poi.name))]
    pub async fn resolve(&self, poi: &PointOfInterest) -> Result<Resolution, ApplicationError> {
        poi.validate()?;

        let (location, provider_name) = match poi.location {
            Some(known) => {
                debug!(location = %known, "Using known coordinate");
                (known, None)
            },
            None => match self.geocoder.geocode(&GeocodeQuery::from(poi)).await? {
                Some(place) => {
                    debug!(location = %place.location, display_name = %place.display_name, "Geocoded");
                    (place.location, Some(place.display_name))
                },
                None => {
                    return Ok(Resolution::Flagged {
                        reason: FlagReason::CouldNotGeocode,
                    });
                },
            },
        };

        let Some(nearest) = self.locator.nearest(&location) else {
            return Ok(Resolution::Flagged {
                reason: FlagReason::NoStationFound,
            });
        };

        debug!(
            station = %nearest.station,
            raw_distance = nearest.raw_distance,
            metric = %nearest.metric,
            "Nearest station"
        );

        let route = self
            .estimator
            .estimate(&nearest.station_location, &location)
            .await;

        Ok(Resolution::Resolved(ResolvedLocation::new(
            poi,
            location,
            nearest.station.id,
            route,
            provider_name,
        )))
    }
}

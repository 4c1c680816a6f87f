//! Nearest-station lookup
//!
//! Haversine meters decide the winner. Planar degrees are only used as an
//! optional ranking pre-filter and never leave this module.

use std::sync::Arc;

use domain::entities::Station;
use domain::value_objects::{DistanceMetric, GeoLocation};
use serde::Serialize;

/// Result of a nearest-station lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestStation {
    /// Winning station
    pub station: Station,
    /// Coordinate of the winning station
    pub station_location: GeoLocation,
    /// Raw distance between the point and the station, in `metric` units
    pub raw_distance: f64,
    /// Metric `raw_distance` is expressed in
    pub metric: DistanceMetric,
}

/// Find the station closest to `point` under `metric`
///
/// Stations without coordinates are ignored. Ties go to the station that
/// appears first in `stations`. Returns `None` when no station has a
/// coordinate.
#[must_use]
pub fn nearest_by(
    point: &GeoLocation,
    stations: &[Station],
    metric: DistanceMetric,
) -> Option<NearestStation> {
    let mut best: Option<(&Station, GeoLocation, f64)> = None;

    for station in stations {
        let Some(location) = station.location else {
            continue;
        };
        let distance = metric.measure(point, &location);
        if best.is_none_or(|(_, _, d)| distance < d) {
            best = Some((station, location, distance));
        }
    }

    best.map(|(station, station_location, raw_distance)| NearestStation {
        station: station.clone(),
        station_location,
        raw_distance,
        metric,
    })
}

/// Nearest-station locator over an immutable station set
#[derive(Debug, Clone)]
pub struct StationLocator {
    stations: Arc<[Station]>,
    prefilter: Option<usize>,
}

impl StationLocator {
    /// Create a locator over a shared station set
    #[must_use]
    pub fn new(stations: impl Into<Arc<[Station]>>) -> Self {
        Self {
            stations: stations.into(),
            prefilter: None,
        }
    }

    /// Rank by planar degrees first and only measure the `k` closest exactly
    ///
    /// Useful for large station sets. `k` is clamped to at least 1.
    #[must_use]
    pub fn with_prefilter(mut self, k: usize) -> Self {
        self.prefilter = Some(k.max(1));
        self
    }

    /// Shared station set
    #[must_use]
    pub fn stations(&self) -> &Arc<[Station]> {
        &self.stations
    }

    /// Number of stations with a usable coordinate
    #[must_use]
    pub fn located_count(&self) -> usize {
        self.stations.iter().filter(|s| s.has_location()).count()
    }

    /// Nearest station by haversine distance
    #[must_use]
    pub fn nearest(&self, point: &GeoLocation) -> Option<NearestStation> {
        match self.prefilter {
            Some(k) if k < self.stations.len() => self.nearest_prefiltered(point, k),
            _ => nearest_by(point, &self.stations, DistanceMetric::Haversine),
        }
    }

    fn nearest_prefiltered(&self, point: &GeoLocation, k: usize) -> Option<NearestStation> {
        let mut ranked: Vec<(usize, f64)> = self
            .stations
            .iter()
            .enumerate()
            .filter_map(|(idx, s)| {
                s.location
                    .map(|loc| (idx, DistanceMetric::PlanarDegrees.measure(point, &loc)))
            })
            .collect();

        // stable sort, then restore input order so ties still go to the first station
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked.truncate(k);
        ranked.sort_unstable_by_key(|(idx, _)| *idx);

        let shortlist: Vec<Station> = ranked
            .into_iter()
            .map(|(idx, _)| self.stations[idx].clone())
            .collect();

        nearest_by(point, &shortlist, DistanceMetric::Haversine)
    }
}

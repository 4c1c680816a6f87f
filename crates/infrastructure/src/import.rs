//! JSON input files
//!
//! Stations and points of interest are read from JSON arrays:
//!
//! ```json
//! [{"id": "ns1", "name": "Jurong East", "latitude": 1.333, "longitude": 103.742}]
//! [{"id": "p1", "name": "Test Cafe", "address": "1 Example Road"}]
//! ```
//!
//! Coordinates are optional but must come as a pair.

use std::path::Path;

use domain::entities::{PointOfInterest, Station};
use domain::value_objects::{GeoLocation, StationId};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Input file errors
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record {index} ({id}): {message}")]
    InvalidRecord {
        index: usize,
        id: String,
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct StationRecord {
    id: String,
    name: String,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PointOfInterestRecord {
    id: String,
    name: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

fn coordinate_pair(
    index: usize,
    id: &str,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<GeoLocation>, ImportError> {
    let invalid = |message: String| ImportError::InvalidRecord {
        index,
        id: id.to_string(),
        message,
    };

    match (latitude, longitude) {
        (Some(lat), Some(lon)) => GeoLocation::new(lat, lon)
            .map(Some)
            .map_err(|e| invalid(e.to_string())),
        (None, None) => Ok(None),
        _ => Err(invalid(
            "latitude and longitude must be given together".to_string(),
        )),
    }
}

fn read_file(path: &Path) -> Result<String, ImportError> {
    std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Parse a JSON array of stations
///
/// # Errors
///
/// Returns an error for malformed JSON, a blank id or a bad coordinate.
pub fn parse_stations(json: &str) -> Result<Vec<Station>, ImportError> {
    let records: Vec<StationRecord> = serde_json::from_str(json)?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let id = StationId::new(&record.id).map_err(|e| ImportError::InvalidRecord {
                index,
                id: record.id.clone(),
                message: e.to_string(),
            })?;
            let location = coordinate_pair(index, &record.id, record.latitude, record.longitude)?;
            Ok(match location {
                Some(location) => Station::new(id, record.name, location),
                None => Station::without_location(id, record.name),
            })
        })
        .collect()
}

/// Read a JSON array of stations from a file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_stations(path: &Path) -> Result<Vec<Station>, ImportError> {
    let stations = parse_stations(&read_file(path)?)?;
    debug!(path = %path.display(), count = stations.len(), "Read stations");
    Ok(stations)
}

/// Parse a JSON array of points of interest
///
/// Blank names are kept; the resolver rejects them per item.
///
/// # Errors
///
/// Returns an error for malformed JSON or a bad coordinate.
pub fn parse_points_of_interest(json: &str) -> Result<Vec<PointOfInterest>, ImportError> {
    let records: Vec<PointOfInterestRecord> = serde_json::from_str(json)?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let location = coordinate_pair(index, &record.id, record.latitude, record.longitude)?;
            let mut poi = PointOfInterest::new(record.id, record.name);
            if let Some(address) = record.address.filter(|a| !a.trim().is_empty()) {
                poi = poi.with_address(address);
            }
            if let Some(location) = location {
                poi = poi.with_location(location);
            }
            Ok(poi)
        })
        .collect()
}

/// Read a JSON array of points of interest from a file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_points_of_interest(path: &Path) -> Result<Vec<PointOfInterest>, ImportError> {
    let items = parse_points_of_interest(&read_file(path)?)?;
    debug!(path = %path.display(), count = items.len(), "Read points of interest");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_stations_with_and_without_location() {
        let stations = parse_stations(
            r#"[
                {"id": "ns1", "name": "Jurong East", "latitude": 1.333, "longitude": 103.742},
                {"id": "tbd", "name": "Future Station"}
            ]"#,
        )
        .unwrap();

        assert_eq!(stations.len(), 2);
        assert!(stations[0].has_location());
        assert!(!stations[1].has_location());
    }

    #[test]
    fn rejects_half_coordinates() {
        let err = parse_stations(r#"[{"id": "x", "name": "X", "latitude": 1.3}]"#).unwrap_err();
        assert!(matches!(err, ImportError::InvalidRecord { index: 0, .. }));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let err = parse_stations(
            r#"[{"id": "ok", "name": "Ok"}, {"id": "bad", "name": "Bad", "latitude": 91.0, "longitude": 0.0}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::InvalidRecord { index: 1, ref id, .. } if id == "bad"));
    }

    #[test]
    fn rejects_blank_station_id() {
        let err = parse_stations(r#"[{"id": "  ", "name": "Nameless"}]"#).unwrap_err();
        assert!(matches!(err, ImportError::InvalidRecord { .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse_stations("{not json"),
            Err(ImportError::Json(_))
        ));
    }

    #[test]
    fn parses_points_of_interest() {
        let items = parse_points_of_interest(
            r#"[
                {"id": "p1", "name": "Test Cafe", "address": "1 Example Road"},
                {"id": "p2", "name": "Known Spot", "latitude": 1.3, "longitude": 103.8},
                {"id": "p3", "name": "Blank Address", "address": "  "}
            ]"#,
        )
        .unwrap();

        assert_eq!(items[0].address.as_deref(), Some("1 Example Road"));
        assert!(items[0].location.is_none());
        assert!(items[1].location.is_some());
        assert!(items[2].address.is_none());
    }

    #[test]
    fn blank_names_are_kept_for_per_item_errors() {
        let items = parse_points_of_interest(r#"[{"id": "p1", "name": ""}]"#).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].validate().is_err());
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": "p1", "name": "Test Cafe"}}]"#).unwrap();

        let items = read_points_of_interest(file.path()).unwrap();
        assert_eq!(items[0].name, "Test Cafe");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_stations(Path::new("/nonexistent/stations.json")).unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/stations.json"));
    }
}

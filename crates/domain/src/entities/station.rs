//! Station entity - Fixed transit stops used as geographic anchors

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::{GeoLocation, StationId};

/// A transit station from the reference dataset
///
/// Reference rows occasionally lack coordinates; such stations are kept so
/// they can be reported, but they never win a nearest-station lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Stable slug
    pub id: StationId,
    /// Display name
    pub name: String,
    /// Coordinate, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
}

impl Station {
    /// Create a station with a known coordinate
    #[must_use]
    pub fn new(id: StationId, name: impl Into<String>, location: GeoLocation) -> Self {
        Self {
            id,
            name: name.into(),
            location: Some(location),
        }
    }

    /// Create a station whose coordinate is missing from the reference data
    #[must_use]
    pub fn without_location(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            location: None,
        }
    }

    /// Whether the station can take part in distance ranking
    #[must_use]
    pub const fn has_location(&self) -> bool {
        self.location.is_some()
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station_id(s: &str) -> StationId {
        StationId::new(s).unwrap()
    }

    #[test]
    fn new_station_has_location() {
        let station = Station::new(
            station_id("bugis"),
            "Bugis",
            GeoLocation::new(1.3009, 103.8558).unwrap(),
        );
        assert!(station.has_location());
    }

    #[test]
    fn station_without_location() {
        let station = Station::without_location(station_id("ghost"), "Ghost");
        assert!(!station.has_location());
    }

    #[test]
    fn display_shows_name_and_id() {
        let station = Station::without_location(station_id("city-hall"), "City Hall");
        assert_eq!(station.to_string(), "City Hall (city-hall)");
    }

    #[test]
    fn deserialize_without_location() {
        let json = r#"{"id": "outram-park", "name": "Outram Park"}"#;
        let station: Station = serde_json::from_str(json).unwrap();
        assert_eq!(station.id.as_str(), "outram-park");
        assert!(station.location.is_none());
    }

    #[test]
    fn deserialize_with_location() {
        let json = r#"{
            "id": "orchard",
            "name": "Orchard",
            "location": {"latitude": 1.3043, "longitude": 103.8318}
        }"#;
        let station: Station = serde_json::from_str(json).unwrap();
        assert!(station.has_location());
    }
}

//! Point of interest entity - An external listing awaiting resolution

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::GeoLocation;

/// A place to be anchored to its nearest station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Identifier used to key the resolved output
    pub id: String,
    /// Listing name, required
    pub name: String,
    /// Free-text address used to disambiguate geocoding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Coordinate already known from the upstream source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
}

impl PointOfInterest {
    /// Create a point of interest with neither address nor coordinate
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: None,
            location: None,
        }
    }

    /// Attach a free-text address
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Attach a known coordinate
    #[must_use]
    pub const fn with_location(mut self, location: GeoLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Address with surrounding whitespace removed, `None` when blank
    #[must_use]
    pub fn trimmed_address(&self) -> Option<&str> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// Check the input constraints
    ///
    /// # Errors
    ///
    /// Returns `InvalidPointOfInterest` if the id or the name is blank.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidPointOfInterest(
                "id must not be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidPointOfInterest(format!(
                "name must not be empty (id {})",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let loc = GeoLocation::new(1.3, 103.8).unwrap();
        let poi = PointOfInterest::new("p1", "Test Cafe")
            .with_address("1 Example Rd, Singapore 123456")
            .with_location(loc);
        assert_eq!(poi.address.as_deref(), Some("1 Example Rd, Singapore 123456"));
        assert_eq!(poi.location, Some(loc));
    }

    #[test]
    fn validate_accepts_named_poi() {
        assert!(PointOfInterest::new("p1", "Test Cafe").validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let err = PointOfInterest::new("p1", "   ").validate().unwrap_err();
        assert!(err.to_string().contains("name must not be empty"));
    }

    #[test]
    fn validate_rejects_blank_id() {
        assert!(PointOfInterest::new("", "Test Cafe").validate().is_err());
    }

    #[test]
    fn trimmed_address_drops_blank() {
        let poi = PointOfInterest::new("p1", "Cafe").with_address("   ");
        assert!(poi.trimmed_address().is_none());

        let poi = PointOfInterest::new("p1", "Cafe").with_address(" 3 Temasek Blvd ");
        assert_eq!(poi.trimmed_address(), Some("3 Temasek Blvd"));
    }

    #[test]
    fn deserialize_minimal() {
        let poi: PointOfInterest =
            serde_json::from_str(r#"{"id": "42", "name": "Hawker Stall"}"#).unwrap();
        assert!(poi.address.is_none());
        assert!(poi.location.is_none());
    }
}

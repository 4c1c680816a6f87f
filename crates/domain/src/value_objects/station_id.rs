//! Station identifier value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Stable slug identifying a transit station (e.g. `"dhoby-ghaut"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationId(String);

impl StationId {
    /// Create a new station id
    ///
    /// Slugs are trimmed and must be non-empty without inner whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let value = id.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::InvalidStationId(
                "Station id must not be empty".to_string(),
            ));
        }

        if value.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidStationId(format!(
                "Station id must not contain whitespace: {value:?}"
            )));
        }

        Ok(Self(value))
    }

    /// Get the slug as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for StationId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for StationId {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slug() {
        let id = StationId::new("test-station").unwrap();
        assert_eq!(id.as_str(), "test-station");
    }

    #[test]
    fn slug_is_trimmed() {
        let id = StationId::new("  bugis \n").unwrap();
        assert_eq!(id.as_str(), "bugis");
    }

    #[test]
    fn empty_slug_rejected() {
        assert!(StationId::new("").is_err());
        assert!(StationId::new("   ").is_err());
    }

    #[test]
    fn inner_whitespace_rejected() {
        assert!(StationId::new("dhoby ghaut").is_err());
    }

    #[test]
    fn serde_is_transparent() {
        let id = StationId::new("orchard").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"orchard\"");

        let back: StationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn serde_rejects_empty() {
        let result: Result<StationId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}

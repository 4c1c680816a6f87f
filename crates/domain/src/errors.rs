//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Coordinates outside the valid latitude/longitude range, or not finite
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Station identifier is not a usable slug
    #[error("Invalid station id: {0}")]
    InvalidStationId(String),

    /// Point of interest is malformed (e.g. empty name)
    #[error("Invalid point of interest: {0}")]
    InvalidPointOfInterest(String),

    /// Route figures reported by a routing service are unusable
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

//! Resolved location store port
//!
//! Output side of the pipeline. Failures here surface as
//! [`ApplicationError::Persistence`] so they are never confused with lookup
//! failures.

use async_trait::async_trait;
use domain::entities::ResolvedLocation;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Identity of an already-resolved row, used for resume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingEntry {
    /// Point-of-interest identifier
    pub poi_id: String,
    /// Point-of-interest name as stored
    pub poi_name: String,
}

/// Port for persisting resolved locations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ResolvedLocationStorePort: Send + Sync {
    /// Insert or replace the row for `location.poi_id`
    async fn save(&self, location: &ResolvedLocation) -> Result<(), ApplicationError>;

    /// Fetch the row for a point of interest
    async fn get(&self, poi_id: &str) -> Result<Option<ResolvedLocation>, ApplicationError>;

    /// Read the identity of every stored row in one query
    async fn load_existing(&self) -> Result<Vec<ExistingEntry>, ApplicationError>;
}

//! Station reference store port

use async_trait::async_trait;
use domain::entities::Station;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the station reference dataset
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StationStorePort: Send + Sync {
    /// Load every station in stable (id) order
    async fn load_all(&self) -> Result<Vec<Station>, ApplicationError>;

    /// Insert or replace stations, returning how many rows were written
    async fn upsert_many(&self, stations: &[Station]) -> Result<usize, ApplicationError>;

    /// Number of stored stations
    async fn count(&self) -> Result<usize, ApplicationError>;
}

//! SQLite resolved location store implementation
//!
//! Implements the `ResolvedLocationStorePort`. Rows are keyed by
//! point-of-interest id and replaced on every save; `resolved_at` records the
//! time of the last write.

use std::sync::Arc;

use application::{ApplicationError, ports::ExistingEntry, ports::ResolvedLocationStorePort};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::entities::ResolvedLocation;
use domain::value_objects::{DistanceSource, GeoLocation, StationId};
use rusqlite::{OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::{ConnectionPool, DatabaseError};
use super::error::{map_db_error, map_join_error};

/// SQLite-based resolved location store
#[derive(Debug, Clone)]
pub struct SqliteResolvedLocationStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteResolvedLocationStore {
    /// Create a new SQLite resolved location store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Time of the last write for a point of interest
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the query fails or the stored
    /// timestamp is malformed.
    #[instrument(skip(self))]
    pub async fn resolved_at(&self, poi_id: &str) -> Result<Option<DateTime<Utc>>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let poi_id = poi_id.to_string();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_db_error)?;
            let raw: Option<String> = conn
                .query_row(
                    "SELECT resolved_at FROM resolved_locations WHERE poi_id = ?1",
                    [&poi_id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(map_db_error)?;

            raw.map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| map_db_error(DatabaseError::InvalidRow(format!("resolved_at: {e}"))))
            })
            .transpose()
        })
        .await
        .map_err(|e| map_join_error(&e))?
    }
}

#[async_trait]
impl ResolvedLocationStorePort for SqliteResolvedLocationStore {
    #[instrument(skip(self, location), fields(poi_id = %location.poi_id))]
    async fn save(&self, location: &ResolvedLocation) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let location = location.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_db_error)?;

            conn.execute(
                "INSERT INTO resolved_locations (
                    poi_id, poi_name, latitude, longitude, station_id,
                    walking_distance_meters, walking_time_minutes, source,
                    provider_name, resolved_at
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(poi_id) DO UPDATE SET
                    poi_name = excluded.poi_name,
                    latitude = excluded.latitude,
                    longitude = excluded.longitude,
                    station_id = excluded.station_id,
                    walking_distance_meters = excluded.walking_distance_meters,
                    walking_time_minutes = excluded.walking_time_minutes,
                    source = excluded.source,
                    provider_name = excluded.provider_name,
                    resolved_at = excluded.resolved_at",
                params![
                    location.poi_id,
                    location.poi_name,
                    location.location.latitude(),
                    location.location.longitude(),
                    location.station_id.as_str(),
                    location.walking_distance_meters,
                    location.walking_time_minutes,
                    location.source.as_str(),
                    location.provider_name,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(map_db_error)?;

            debug!("Saved resolved location");
            Ok(())
        })
        .await
        .map_err(|e| map_join_error(&e))?
    }

    #[instrument(skip(self))]
    async fn get(&self, poi_id: &str) -> Result<Option<ResolvedLocation>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let poi_id = poi_id.to_string();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_db_error)?;

            let row = conn
                .query_row(
                    "SELECT poi_id, poi_name, latitude, longitude, station_id,
                            walking_distance_meters, walking_time_minutes, source, provider_name
                     FROM resolved_locations WHERE poi_id = ?1",
                    [&poi_id],
                    ResolvedRow::from_row,
                )
                .optional()
                .map_err(map_db_error)?;

            row.map(ResolvedRow::into_resolved)
                .transpose()
                .map_err(map_db_error)
        })
        .await
        .map_err(|e| map_join_error(&e))?
    }

    #[instrument(skip(self))]
    async fn load_existing(&self) -> Result<Vec<ExistingEntry>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_db_error)?;

            let mut stmt = conn
                .prepare("SELECT poi_id, poi_name FROM resolved_locations ORDER BY poi_id")
                .map_err(map_db_error)?;

            let entries = stmt
                .query_map([], |row| {
                    Ok(ExistingEntry {
                        poi_id: row.get(0)?,
                        poi_name: row.get(1)?,
                    })
                })
                .map_err(map_db_error)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(map_db_error)?;

            debug!(count = entries.len(), "Loaded existing resolved locations");
            Ok(entries)
        })
        .await
        .map_err(|e| map_join_error(&e))?
    }
}

struct ResolvedRow {
    poi_id: String,
    poi_name: String,
    latitude: f64,
    longitude: f64,
    station_id: String,
    walking_distance_meters: u32,
    walking_time_minutes: u32,
    source: String,
    provider_name: Option<String>,
}

impl ResolvedRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            poi_id: row.get(0)?,
            poi_name: row.get(1)?,
            latitude: row.get(2)?,
            longitude: row.get(3)?,
            station_id: row.get(4)?,
            walking_distance_meters: row.get(5)?,
            walking_time_minutes: row.get(6)?,
            source: row.get(7)?,
            provider_name: row.get(8)?,
        })
    }

    fn into_resolved(self) -> Result<ResolvedLocation, DatabaseError> {
        let invalid = |e: &dyn std::fmt::Display| {
            DatabaseError::InvalidRow(format!("resolved location {}: {e}", self.poi_id))
        };

        let location = GeoLocation::new(self.latitude, self.longitude).map_err(|e| invalid(&e))?;
        let station_id = StationId::new(&self.station_id).map_err(|e| invalid(&e))?;
        let source: DistanceSource = self.source.parse().map_err(|e| invalid(&e))?;

        Ok(ResolvedLocation {
            poi_id: self.poi_id,
            poi_name: self.poi_name,
            location,
            station_id,
            walking_distance_meters: self.walking_distance_meters,
            walking_time_minutes: self.walking_time_minutes,
            source,
            provider_name: self.provider_name,
        })
    }
}

//! SQLite station store implementation
//!
//! Implements the `StationStorePort` for the station reference table.

use std::sync::Arc;

use application::{ApplicationError, ports::StationStorePort};
use async_trait::async_trait;
use domain::entities::Station;
use domain::value_objects::{GeoLocation, StationId};
use rusqlite::{Row, params};
use tokio::task;
use tracing::{debug, info, instrument};

use super::connection::{ConnectionPool, DatabaseError};
use super::error::{map_db_error, map_join_error};

/// SQLite-based station store
#[derive(Debug, Clone)]
pub struct SqliteStationStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteStationStore {
    /// Create a new SQLite station store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StationStorePort for SqliteStationStore {
    #[instrument(skip(self))]
    async fn load_all(&self) -> Result<Vec<Station>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_db_error)?;

            let mut stmt = conn
                .prepare("SELECT id, name, latitude, longitude FROM stations ORDER BY id")
                .map_err(map_db_error)?;

            let rows = stmt
                .query_map([], StationRow::from_row)
                .map_err(map_db_error)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(map_db_error)?;

            let stations = rows
                .into_iter()
                .map(StationRow::into_station)
                .collect::<Result<Vec<_>, _>>()
                .map_err(map_db_error)?;

            info!(count = stations.len(), "Loaded stations");
            Ok(stations)
        })
        .await
        .map_err(|e| map_join_error(&e))?
    }

    #[instrument(skip(self, stations), fields(count = stations.len()))]
    async fn upsert_many(&self, stations: &[Station]) -> Result<usize, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let stations = stations.to_vec();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(map_db_error)?;
            let tx = conn.transaction().map_err(map_db_error)?;

            let mut written = 0;
            {
                let mut stmt = tx
                    .prepare(
                        "INSERT INTO stations (id, name, latitude, longitude)
                         VALUES (?1, ?2, ?3, ?4)
                         ON CONFLICT(id) DO UPDATE SET
                            name = excluded.name,
                            latitude = excluded.latitude,
                            longitude = excluded.longitude",
                    )
                    .map_err(map_db_error)?;

                for station in &stations {
                    written += stmt
                        .execute(params![
                            station.id.as_str(),
                            station.name,
                            station.location.map(|l| l.latitude()),
                            station.location.map(|l| l.longitude()),
                        ])
                        .map_err(map_db_error)?;
                }
            }

            tx.commit().map_err(map_db_error)?;
            debug!(written, "Upserted stations");
            Ok(written)
        })
        .await
        .map_err(|e| map_join_error(&e))?
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<usize, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_db_error)?;
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM stations", [], |row| row.get(0))
                .map_err(map_db_error)?;
            usize::try_from(count).map_err(|e| ApplicationError::Persistence(e.to_string()))
        })
        .await
        .map_err(|e| map_join_error(&e))?
    }
}

struct StationRow {
    id: String,
    name: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl StationRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            latitude: row.get(2)?,
            longitude: row.get(3)?,
        })
    }

    fn into_station(self) -> Result<Station, DatabaseError> {
        let id = StationId::new(&self.id)
            .map_err(|e| DatabaseError::InvalidRow(format!("station {}: {e}", self.id)))?;

        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => {
                let location = GeoLocation::new(lat, lon).map_err(|e| {
                    DatabaseError::InvalidRow(format!("station {}: {e}", self.id))
                })?;
                Ok(Station::new(id, self.name, location))
            },
            _ => Ok(Station::without_location(id, self.name)),
        }
    }
}

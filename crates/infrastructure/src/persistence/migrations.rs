//! Database migrations
//!
//! Schema versions are tracked in `schema_version`. The SQL of each version
//! is mirrored in `migrations/` at the repository root for manual setup.
//!
//! ## Adding New Migrations
//!
//! 1. Create a new SQL file: `migrations/VXXX__description.sql`
//! 2. Increment `SCHEMA_VERSION`
//! 3. Add a `migrate_vX` function and call it from `run_migrations`

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all pending migrations
///
/// # Errors
///
/// Returns an error if a migration statement fails.
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_schema_version(conn)?;

    if current_version >= SCHEMA_VERSION {
        debug!(version = current_version, "Database schema is up to date");
        return Ok(());
    }

    info!(
        from_version = current_version,
        to_version = SCHEMA_VERSION,
        "Running database migrations"
    );

    if current_version < 1 {
        if let Err(e) = migrate_v1(conn) {
            error!(
                version = 1,
                error = %e,
                "Migration V001 (stations and resolved locations) failed"
            );
            return Err(e);
        }
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    info!(version = SCHEMA_VERSION, "Database migrations complete");
    Ok(())
}

/// Current schema version, 0 for a fresh database
///
/// # Errors
///
/// Returns an error if the version table cannot be created or read.
pub fn get_schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration to version 1: stations and resolved locations
/// See: migrations/V001__initial_schema.sql
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: Initial schema");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS stations (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            latitude REAL,
            longitude REAL,
            CHECK ((latitude IS NULL) = (longitude IS NULL))
        );

        CREATE TABLE IF NOT EXISTS resolved_locations (
            poi_id TEXT PRIMARY KEY,
            poi_name TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            station_id TEXT NOT NULL,
            walking_distance_meters INTEGER NOT NULL CHECK (walking_distance_meters >= 0),
            walking_time_minutes INTEGER NOT NULL CHECK (walking_time_minutes >= 0),
            source TEXT NOT NULL CHECK (source IN ('routed', 'estimated')),
            provider_name TEXT,
            resolved_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_resolved_locations_station
            ON resolved_locations(station_id);
        ",
    )?;

    Ok(())
}

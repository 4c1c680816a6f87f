//! SQLite pool setup
//!
//! Every pooled connection gets the same pragmas; the schema is migrated
//! once when the pool is created.

use std::io;
use std::path::{Path, PathBuf};

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// Database errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cannot create database directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Invalid stored row: {0}")]
    InvalidRow(String),
}

/// Pool of SQLite connections shared by the stores
pub type ConnectionPool = Pool<SqliteConnectionManager>;

const CONNECTION_PRAGMAS: &str = "
    PRAGMA foreign_keys = ON;
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous = NORMAL;
    PRAGMA busy_timeout = 5000;
";

fn apply_pragmas(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(CONNECTION_PRAGMAS)
}

fn ensure_parent_dir(db_path: &str) -> Result<(), DatabaseError> {
    let Some(parent) = Path::new(db_path).parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|source| DatabaseError::Directory {
        path: parent.to_path_buf(),
        source,
    })
}

/// Open the pool and bring the schema up to date
///
/// An in-memory database is private to its connection, so its pool is
/// capped at one connection regardless of `max_connections`.
///
/// # Errors
///
/// Returns an error if the database directory cannot be created, the pool
/// cannot be built, or a migration fails.
pub fn create_pool(config: &DatabaseConfig) -> Result<ConnectionPool, DatabaseError> {
    let (manager, max_size) = if config.is_in_memory() {
        (SqliteConnectionManager::memory(), 1)
    } else {
        ensure_parent_dir(&config.path)?;
        (SqliteConnectionManager::file(&config.path), config.max_connections)
    };

    info!(path = %config.path, max_size, "Opening station database");

    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager.with_init(apply_pragmas))?;

    if config.run_migrations {
        super::migrations::run_migrations(&*pool.get()?)?;
    } else {
        debug!("Skipping migrations");
    }

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_pool_has_single_connection() {
        let config = DatabaseConfig {
            max_connections: 8,
            ..DatabaseConfig::in_memory()
        };
        let pool = create_pool(&config).unwrap();
        assert_eq!(pool.max_size(), 1);
        assert!(pool.get().is_ok());
    }

    #[test]
    fn file_pool_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("walk.db");
        let config = DatabaseConfig {
            path: path.to_string_lossy().into_owned(),
            ..Default::default()
        };

        let pool = create_pool(&config).unwrap();
        assert!(pool.get().is_ok());
        assert!(path.exists());
    }

    #[test]
    fn every_connection_gets_pragmas() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("walk.db").to_string_lossy().into_owned(),
            max_connections: 2,
            ..Default::default()
        };
        let pool = create_pool(&config).unwrap();

        let first = pool.get().unwrap();
        let second = pool.get().unwrap();
        for conn in [&first, &second] {
            let fk: i64 = conn
                .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
                .unwrap();
            assert_eq!(fk, 1);
        }
    }

    #[test]
    fn skipping_migrations_leaves_schema_empty() {
        let config = DatabaseConfig {
            run_migrations: false,
            ..DatabaseConfig::in_memory()
        };
        let pool = create_pool(&config).unwrap();
        let conn = pool.get().unwrap();
        assert_eq!(super::super::migrations::get_schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn directory_error_names_path() {
        let err = DatabaseError::Directory {
            path: PathBuf::from("/readonly/db"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/readonly/db"));
    }
}

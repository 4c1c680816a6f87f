//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: Places geocoding,
//! OneMap routing and the SQLite stores, plus configuration loading, retry
//! and logging setup.

pub mod adapters;
pub mod config;
pub mod import;
pub mod persistence;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, DatabaseConfig, LocatorConfig, PlacesAppConfig, RetryAppConfig, RoutingAppConfig,
};
pub use import::{ImportError, read_points_of_interest, read_stations};
pub use persistence::{
    ConnectionPool, DatabaseError, SqliteResolvedLocationStore, SqliteStationStore, create_pool,
};
pub use retry::{RetryConfig, RetryResult, Retryable, with_retry};
pub use telemetry::{LogFormat, TelemetryError, init_tracing};

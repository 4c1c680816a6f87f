//! Persistence module
//!
//! SQLite-based storage for stations and resolved locations.

pub mod connection;
pub mod error;
pub mod migrations;
pub mod resolved_location_store;
pub mod station_store;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use resolved_location_store::SqliteResolvedLocationStore;
pub use station_store::SqliteStationStore;

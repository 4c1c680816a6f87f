//! Shared error mapping for the SQLite persistence layer

use application::ApplicationError;

use super::connection::DatabaseError;

/// Map any store failure to the distinct persistence error
pub fn map_db_error(e: impl Into<DatabaseError>) -> ApplicationError {
    ApplicationError::Persistence(e.into().to_string())
}

/// Map a failed blocking task (panic or cancellation)
pub fn map_join_error(e: &tokio::task::JoinError) -> ApplicationError {
    ApplicationError::Persistence(format!("Database task failed: {e}"))
}

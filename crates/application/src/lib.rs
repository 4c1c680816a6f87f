//! Application layer - Use cases and orchestration
//!
//! Contains the resolution pipeline (geocode, locate, route) and the batch
//! runner, plus the port definitions adapters implement.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;

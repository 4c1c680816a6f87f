//! Domain layer for Station Walk
//!
//! Contains the core vocabulary of the resolution pipeline: coordinates,
//! stations, points of interest, walking routes and resolved locations.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;

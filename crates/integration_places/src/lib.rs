//! Text-search geocoding for Station Walk
//!
//! Resolves free-text place descriptions ("<name> <address> <country>") to
//! coordinates via the [Google Places API](https://developers.google.com/maps/documentation/places/web-service/text-search)
//! text search endpoint.
//!
//! # Architecture
//!
//! [`PlacesClient`] defines the interface, implemented by
//! [`GooglePlacesClient`]. The client asks for a single ranked candidate and
//! caches hits by normalized query.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_places::{GooglePlacesClient, PlacesClient, PlacesConfig};
//!
//! let config = PlacesConfig::with_api_key("AIza...");
//! let client = GooglePlacesClient::new(&config)?;
//!
//! let hit = client.geocode("Test Cafe", Some("1 Example Rd")).await?;
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{GooglePlacesClient, PlacesClient, build_query};
pub use config::PlacesConfig;
pub use error::PlacesError;
pub use models::PlaceCandidate;

//! Infrastructure adapters
//!
//! Adapters connect application ports to the geocoding and routing clients.

mod onemap_routing_adapter;
mod places_geocoder_adapter;
mod unconfigured_geocoder;

pub use onemap_routing_adapter::OneMapRoutingAdapter;
pub use places_geocoder_adapter::PlacesGeocoderAdapter;
pub use unconfigured_geocoder::{PLACES_API_KEY_ENV, UnconfiguredGeocoder};

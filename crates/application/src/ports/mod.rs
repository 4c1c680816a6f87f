//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod geocoder_port;
mod resolved_location_store;
mod routing_port;
mod station_store;

#[cfg(test)]
pub use geocoder_port::MockGeocoderPort;
pub use geocoder_port::{GeocodeQuery, GeocodedPlace, GeocoderPort};
#[cfg(test)]
pub use resolved_location_store::MockResolvedLocationStorePort;
pub use resolved_location_store::{ExistingEntry, ResolvedLocationStorePort};
#[cfg(test)]
pub use routing_port::MockRoutingPort;
pub use routing_port::{RouteMeasurement, RoutingPort};
#[cfg(test)]
pub use station_store::MockStationStorePort;
pub use station_store::StationStorePort;

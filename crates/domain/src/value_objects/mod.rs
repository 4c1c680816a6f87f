//! Value Objects - Immutable, identity-less domain primitives

mod distance_metric;
mod distance_source;
mod geo_location;
mod station_id;

pub use distance_metric::DistanceMetric;
pub use distance_source::DistanceSource;
pub use geo_location::{EARTH_RADIUS_METERS, GeoLocation, InvalidCoordinates};
pub use station_id::StationId;

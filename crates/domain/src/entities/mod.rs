//! Entities - Domain objects carried through the resolution pipeline

mod point_of_interest;
mod resolved_location;
mod station;
mod walking_route;

pub use point_of_interest::PointOfInterest;
pub use resolved_location::ResolvedLocation;
pub use station::Station;
pub use walking_route::{DETOUR_FACTOR, WALKING_SPEED_METERS_PER_MINUTE, WalkingRoute};

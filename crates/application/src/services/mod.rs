//! Application services - Use case implementations

mod batch_runner;
mod location_resolver;
mod name_index;
mod route_estimator;
mod station_locator;

pub use batch_runner::{
    BatchConfig, BatchReport, BatchRunner, ErroredItem, FailureKind, FlaggedItem, NameMismatch,
};
pub use location_resolver::{FlagReason, LocationResolver, Resolution};
pub use name_index::{NAME_MATCH_THRESHOLD, ResumeIndex, name_similarity, names_match, normalize_name};
pub use route_estimator::RouteEstimator;
pub use station_locator::{NearestStation, StationLocator, nearest_by};

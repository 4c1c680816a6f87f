//! Routing data models

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Totals of one computed walking route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Total distance in meters
    pub distance_meters: f64,
    /// Total time in seconds
    pub time_seconds: f64,
}

/// A bearer token for the routing service
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Create a token with an optional expiry
    #[must_use]
    pub fn new(value: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Raw token value for the `Authorization` header
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Expiry reported by the service, if any
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the token expires within `margin` of `now`
    ///
    /// Tokens without a known expiry are assumed valid.
    #[must_use]
    pub fn expires_within(&self, now: DateTime<Utc>, margin: TimeDelta) -> bool {
        self.expires_at.is_some_and(|exp| exp - now <= margin)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

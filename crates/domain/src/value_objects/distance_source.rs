//! Provenance of a walking distance

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Which stage produced a walking distance/time pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    /// Reported by a pedestrian routing service
    Routed,
    /// Derived from straight-line distance with a detour factor
    Estimated,
}

impl DistanceSource {
    /// Stable lowercase label used in storage and reports
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Routed => "routed",
            Self::Estimated => "estimated",
        }
    }

    /// Whether the value came from an authoritative routing service
    #[must_use]
    pub const fn is_authoritative(&self) -> bool {
        matches!(self, Self::Routed)
    }
}

impl fmt::Display for DistanceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DistanceSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "routed" => Ok(Self::Routed),
            "estimated" => Ok(Self::Estimated),
            other => Err(DomainError::ValidationError(format!(
                "Unknown distance source: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for source in [DistanceSource::Routed, DistanceSource::Estimated] {
            assert_eq!(source.as_str().parse::<DistanceSource>().unwrap(), source);
        }
    }

    #[test]
    fn unknown_label_rejected() {
        assert!("guessed".parse::<DistanceSource>().is_err());
    }

    #[test]
    fn only_routed_is_authoritative() {
        assert!(DistanceSource::Routed.is_authoritative());
        assert!(!DistanceSource::Estimated.is_authoritative());
    }
}

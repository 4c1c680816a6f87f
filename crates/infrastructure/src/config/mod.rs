//! Application configuration
//!
//! Split into focused sub-modules:
//! - `integrations`: Places geocoding and routing services
//! - `database`: SQLite database settings
//! - `resilience`: Retry behaviour for external calls
//!
//! Values are layered: built-in defaults, then an optional `config.toml`,
//! then `STATION_WALK_*` environment variables with `__` between nested keys
//! (e.g. `STATION_WALK_PLACES__API_KEY`).

mod database;
mod integrations;
mod resilience;

use std::path::Path;

use application::BatchConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use database::DatabaseConfig;
pub use integrations::{PlacesAppConfig, RoutingAppConfig};
pub use resilience::RetryAppConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "STATION_WALK";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Nearest-station lookup settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Only measure the `k` planar-closest stations exactly (full scan when unset)
    #[serde(default)]
    pub prefilter_k: Option<usize>,
}

impl LocatorConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.prefilter_k == Some(0) {
            return Err("prefilter_k must be greater than 0 when set".to_string());
        }
        Ok(())
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Text-search geocoding
    #[serde(default)]
    pub places: PlacesAppConfig,

    /// Pedestrian routing
    #[serde(default)]
    pub routing: RoutingAppConfig,

    /// SQLite database
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Batch pacing and partitioning
    #[serde(default)]
    pub batch: BatchConfig,

    /// Retry behaviour for external calls
    #[serde(default)]
    pub retry: RetryAppConfig,

    /// Nearest-station lookup
    #[serde(default)]
    pub locator: LocatorConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name("config").required(false))
    }

    /// Load configuration from an explicit file plus the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or a source cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let builder = config::Config::builder()
            .set_default("database.path", DatabaseConfig::default().path)?
            .set_default("routing.route_type", "walk")?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            places: PlacesAppConfig::for_testing(),
            routing: RoutingAppConfig::default(),
            database: DatabaseConfig::in_memory(),
            batch: BatchConfig::for_testing(),
            retry: RetryAppConfig::default(),
            locator: LocatorConfig::default(),
        }
    }

    /// Validate every section, collecting all problems
    ///
    /// # Errors
    ///
    /// Returns one message per invalid section.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let checks = [
            ("places", self.places.validate()),
            ("routing", self.routing.validate()),
            ("database", self.database.validate()),
            ("batch", self.batch.validate()),
            ("retry", self.retry.validate()),
            ("locator", self.locator.validate()),
        ];

        let errors: Vec<String> = checks
            .into_iter()
            .filter_map(|(section, result)| result.err().map(|e| format!("{section}: {e}")))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

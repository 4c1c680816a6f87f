//! External service configurations: Places geocoding and pedestrian routing.

use integration_places::PlacesConfig;
use integration_routing::RoutingConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::default_true;

const fn redacted(present: bool) -> Option<&'static str> {
    if present { Some("[REDACTED]") } else { None }
}

// ==============================
// Places Configuration
// ==============================

/// Google Places text-search configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct PlacesAppConfig {
    /// API key (sensitive - uses `SecretString`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Base URL for the Places API
    #[serde(default = "default_places_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_places_timeout")]
    pub timeout_secs: u64,

    /// Appended to every query to bias results to one country
    #[serde(default = "default_country_hint")]
    pub country_hint: String,

    /// Geocode cache TTL in minutes (0 disables the cache)
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u64,
}

fn default_places_base_url() -> String {
    PlacesConfig::default().base_url
}

const fn default_places_timeout() -> u64 {
    10
}

fn default_country_hint() -> String {
    PlacesConfig::default().country_hint
}

const fn default_cache_ttl_minutes() -> u64 {
    24 * 60
}

impl Default for PlacesAppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_places_base_url(),
            timeout_secs: default_places_timeout(),
            country_hint: default_country_hint(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
        }
    }
}

impl std::fmt::Debug for PlacesAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesAppConfig")
            .field("api_key", &redacted(self.api_key.is_some()))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("country_hint", &self.country_hint)
            .field("cache_ttl_minutes", &self.cache_ttl_minutes)
            .finish()
    }
}

impl PlacesAppConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: Some(SecretString::from("test-key".to_string())),
            timeout_secs: 5,
            cache_ttl_minutes: 0,
            ..Default::default()
        }
    }

    /// Whether a non-empty API key is configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }

    /// Validate the configuration
    ///
    /// A missing API key is not an error here; commands that need geocoding
    /// fail when they build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Convert to the client configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured.
    pub fn to_places_config(&self) -> Result<PlacesConfig, String> {
        let api_key = self
            .api_key
            .as_ref()
            .map(|key| key.expose_secret().trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| "places.api_key is not set".to_string())?;

        let config = PlacesConfig {
            base_url: self.base_url.clone(),
            api_key,
            timeout_secs: self.timeout_secs,
            country_hint: self.country_hint.clone(),
            cache_ttl_minutes: self.cache_ttl_minutes,
            ..PlacesConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

// ==============================
// Routing Configuration
// ==============================

/// OneMap pedestrian routing configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct RoutingAppConfig {
    /// Use the routing service (the detour estimate is used when disabled)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL for the OneMap API
    #[serde(default = "default_routing_base_url")]
    pub base_url: String,

    /// Account email used to obtain access tokens
    #[serde(default)]
    pub email: Option<String>,

    /// Account password (sensitive - uses `SecretString`)
    #[serde(default, skip_serializing)]
    pub password: Option<SecretString>,

    /// Pre-issued access token (sensitive - uses `SecretString`)
    #[serde(default, skip_serializing)]
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_routing_timeout")]
    pub timeout_secs: u64,

    /// Route type passed to the service
    #[serde(default = "default_route_type")]
    pub route_type: String,
}

fn default_routing_base_url() -> String {
    RoutingConfig::default().base_url
}

const fn default_routing_timeout() -> u64 {
    15
}

fn default_route_type() -> String {
    "walk".to_string()
}

impl Default for RoutingAppConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_routing_base_url(),
            email: None,
            password: None,
            token: None,
            timeout_secs: default_routing_timeout(),
            route_type: default_route_type(),
        }
    }
}

impl std::fmt::Debug for RoutingAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingAppConfig")
            .field("enabled", &self.enabled)
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("password", &redacted(self.password.is_some()))
            .field("token", &redacted(self.token.is_some()))
            .field("timeout_secs", &self.timeout_secs)
            .field("route_type", &self.route_type)
            .finish()
    }
}

impl RoutingAppConfig {
    fn secret(value: Option<&SecretString>) -> Option<String> {
        value
            .map(|s| s.expose_secret().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Whether routing is enabled and has credentials or a token
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.enabled && self.to_routing_config().is_ok()
    }

    /// Validate the configuration
    ///
    /// Missing credentials are allowed; routing then falls back to estimates.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.route_type.trim().is_empty() {
            return Err("route_type must not be empty".to_string());
        }
        Ok(())
    }

    /// Convert to the client configuration
    ///
    /// # Errors
    ///
    /// Returns an error if neither credentials nor a token are configured.
    pub fn to_routing_config(&self) -> Result<RoutingConfig, String> {
        let config = RoutingConfig {
            base_url: self.base_url.clone(),
            email: self.email.clone().unwrap_or_default(),
            password: Self::secret(self.password.as_ref()).unwrap_or_default(),
            token: Self::secret(self.token.as_ref()),
            timeout_secs: self.timeout_secs,
            route_type: self.route_type.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

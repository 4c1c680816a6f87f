//! Routing service configuration

use serde::{Deserialize, Serialize};

/// Configuration for the OneMap pedestrian routing client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Base URL for the OneMap API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Account email used to obtain access tokens
    #[serde(default)]
    pub email: String,

    /// Account password used to obtain access tokens
    #[serde(default)]
    pub password: String,

    /// Pre-issued access token (skips the first token request)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Route type passed to the service
    #[serde(default = "default_route_type")]
    pub route_type: String,
}

fn default_base_url() -> String {
    "https://www.onemap.gov.sg".to_string()
}

const fn default_timeout_secs() -> u64 {
    15
}

fn default_route_type() -> String {
    "walk".to_string()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            email: String::new(),
            password: String::new(),
            token: None,
            timeout_secs: default_timeout_secs(),
            route_type: default_route_type(),
        }
    }
}

impl RoutingConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            email: "test@example.com".to_string(),
            password: "secret".to_string(),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Whether account credentials are available for token refresh
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.route_type.trim().is_empty() {
            return Err("route_type must not be empty".to_string());
        }

        if !self.has_credentials() && self.token.as_deref().is_none_or(str::is_empty) {
            return Err("either email/password or token must be set".to_string());
        }

        Ok(())
    }
}

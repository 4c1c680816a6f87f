//! Places service configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Google Places text-search client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// Base URL for the Places API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as `X-Goog-Api-Key`
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Appended to every query to bias results to one country
    #[serde(default = "default_country_hint")]
    pub country_hint: String,

    /// Preferred language of display names
    #[serde(default = "default_language_code")]
    pub language_code: String,

    /// Cache TTL in minutes (0 to disable caching)
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u64,
}

fn default_base_url() -> String {
    "https://places.googleapis.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_country_hint() -> String {
    "Singapore".to_string()
}

fn default_language_code() -> String {
    "en".to_string()
}

const fn default_cache_ttl_minutes() -> u64 {
    24 * 60
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            country_hint: default_country_hint(),
            language_code: default_language_code(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
        }
    }
}

impl PlacesConfig {
    /// Default configuration with the given API key
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            cache_ttl_minutes: 0,
            ..Default::default()
        }
    }

    /// Check if caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_ttl_minutes > 0
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

        if self.api_key.trim().is_empty() {
            return Err("api_key must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlacesConfig::default();
        assert_eq!(config.base_url, "https://places.googleapis.com");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.country_hint, "Singapore");
        assert_eq!(config.language_code, "en");
        assert!(config.caching_enabled());
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_testing_config() {
        let config = PlacesConfig::for_testing();
        assert_eq!(config.timeout_secs, 5);
        assert!(!config.caching_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_missing_key() {
        let config = PlacesConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = PlacesConfig {
            timeout_secs: 0,
            ..PlacesConfig::for_testing()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: PlacesConfig = serde_json::from_str(r#"{"api_key": "k"}"#).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.country_hint, "Singapore");
    }
}

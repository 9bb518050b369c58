//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/loc-explore/config.toml

pub mod defaults;

use crate::ai::ApiKey;
use crate::analysis::CoordinateCheck;
use crate::constants::{api, initial};
use crate::coord::{Coordinates, NamedLocation};
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Geocoding service settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Generative AI service settings
    #[serde(default)]
    pub ai: AiConfig,

    /// Analysis behaviour
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Starting location before the first search
    #[serde(default)]
    pub location: LocationConfig,

    /// API keys for various services
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Nominatim base URL
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-attempt timeout in seconds
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,

    /// Extra attempts after a transient failure
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Delay before the first retry in milliseconds
    #[serde(default = "default_backoff")]
    pub backoff_ms: u64,
}

/// Generative AI service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Gemini API base URL
    #[serde(default = "default_ai_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-attempt timeout in seconds
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,

    /// Extra attempts after a transient failure
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Delay before the first retry in milliseconds
    #[serde(default = "default_backoff")]
    pub backoff_ms: u64,
}

/// Analysis behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Analysis type used by the CLI when none is given
    #[serde(default = "default_analysis_type")]
    pub default_type: String,

    /// How a suggested coordinate is judged missing: "falsy" or "strict"
    #[serde(default = "default_coordinate_check")]
    pub coordinate_check: String,
}

/// Starting location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_initial_lat")]
    pub lat: f64,

    #[serde(default = "default_initial_lng")]
    pub lng: f64,

    #[serde(default = "default_initial_name")]
    pub name: String,
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiKeysConfig {
    /// Gemini API key, used when the environment variable is unset
    #[serde(default)]
    pub gemini: String,
}

// Default value functions for serde
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_geocoder_url() -> String {
    api::NOMINATIM_URL.to_string()
}
fn default_user_agent() -> String {
    api::USER_AGENT.to_string()
}
fn default_geocoder_timeout() -> u64 {
    DEFAULT_GEOCODER_TIMEOUT_SECS
}
fn default_ai_url() -> String {
    api::GEMINI_URL.to_string()
}
fn default_model() -> String {
    api::GEMINI_MODEL.to_string()
}
fn default_api_key_env() -> String {
    api::GEMINI_API_KEY_ENV.to_string()
}
fn default_ai_timeout() -> u64 {
    DEFAULT_AI_TIMEOUT_SECS
}
fn default_retries() -> u32 {
    DEFAULT_RETRIES
}
fn default_backoff() -> u64 {
    DEFAULT_BACKOFF_MS
}
fn default_analysis_type() -> String {
    DEFAULT_ANALYSIS_TYPE.to_string()
}
fn default_coordinate_check() -> String {
    DEFAULT_COORDINATE_CHECK.to_string()
}
fn default_initial_lat() -> f64 {
    initial::LAT
}
fn default_initial_lng() -> f64 {
    initial::LNG
}
fn default_initial_name() -> String {
    initial::NAME.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoder_timeout(),
            retries: default_retries(),
            backoff_ms: default_backoff(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: default_ai_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_ai_timeout(),
            retries: default_retries(),
            backoff_ms: default_backoff(),
        }
    }
}

impl AiConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_settings(self.timeout_secs, self.retries, self.backoff_ms)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_type: default_analysis_type(),
            coordinate_check: default_coordinate_check(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            lat: default_initial_lat(),
            lng: default_initial_lng(),
            name: default_initial_name(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["geocoder", "base_url"] => Some(self.geocoder.base_url.clone()),
            ["geocoder", "user_agent"] => Some(self.geocoder.user_agent.clone()),
            ["geocoder", "timeout_secs"] => Some(self.geocoder.timeout_secs.to_string()),
            ["geocoder", "retries"] => Some(self.geocoder.retries.to_string()),
            ["geocoder", "backoff_ms"] => Some(self.geocoder.backoff_ms.to_string()),

            ["ai", "base_url"] => Some(self.ai.base_url.clone()),
            ["ai", "model"] => Some(self.ai.model.clone()),
            ["ai", "api_key_env"] => Some(self.ai.api_key_env.clone()),
            ["ai", "timeout_secs"] => Some(self.ai.timeout_secs.to_string()),
            ["ai", "retries"] => Some(self.ai.retries.to_string()),
            ["ai", "backoff_ms"] => Some(self.ai.backoff_ms.to_string()),

            ["analysis", "default_type"] => Some(self.analysis.default_type.clone()),
            ["analysis", "coordinate_check"] => Some(self.analysis.coordinate_check.clone()),

            ["location", "lat"] => Some(self.location.lat.to_string()),
            ["location", "lng"] => Some(self.location.lng.to_string()),
            ["location", "name"] => Some(self.location.name.clone()),

            ["api_keys", "gemini"] => Some(self.api_keys.gemini.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse_value(key, value)?,

            ["geocoder", "base_url"] => self.geocoder.base_url = value.to_string(),
            ["geocoder", "user_agent"] => self.geocoder.user_agent = value.to_string(),
            ["geocoder", "timeout_secs"] => self.geocoder.timeout_secs = parse_value(key, value)?,
            ["geocoder", "retries"] => self.geocoder.retries = parse_value(key, value)?,
            ["geocoder", "backoff_ms"] => self.geocoder.backoff_ms = parse_value(key, value)?,

            ["ai", "base_url"] => self.ai.base_url = value.to_string(),
            ["ai", "model"] => self.ai.model = value.to_string(),
            ["ai", "api_key_env"] => self.ai.api_key_env = value.to_string(),
            ["ai", "timeout_secs"] => self.ai.timeout_secs = parse_value(key, value)?,
            ["ai", "retries"] => self.ai.retries = parse_value(key, value)?,
            ["ai", "backoff_ms"] => self.ai.backoff_ms = parse_value(key, value)?,

            ["analysis", "default_type"] => self.analysis.default_type = value.to_string(),
            ["analysis", "coordinate_check"] => {
                value.parse::<CoordinateCheck>().map_err(Error::Config)?;
                self.analysis.coordinate_check = value.to_lowercase();
            }

            ["location", "lat"] => self.location.lat = parse_value(key, value)?,
            ["location", "lng"] => self.location.lng = parse_value(key, value)?,
            ["location", "name"] => self.location.name = value.to_string(),

            ["api_keys", "gemini"] => self.api_keys.gemini = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "server.host",
            "server.port",
            "geocoder.base_url",
            "geocoder.user_agent",
            "geocoder.timeout_secs",
            "geocoder.retries",
            "geocoder.backoff_ms",
            "ai.base_url",
            "ai.model",
            "ai.api_key_env",
            "ai.timeout_secs",
            "ai.retries",
            "ai.backoff_ms",
            "analysis.default_type",
            "analysis.coordinate_check",
            "location.lat",
            "location.lng",
            "location.name",
            "api_keys.gemini",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Resolve the Gemini API key
    ///
    /// The environment variable named by `ai.api_key_env` wins over
    /// `api_keys.gemini`. Blank values count as unset.
    pub fn api_key(&self) -> Option<ApiKey> {
        std::env::var(&self.ai.api_key_env)
            .ok()
            .and_then(ApiKey::new)
            .or_else(|| ApiKey::new(self.api_keys.gemini.clone()))
    }

    /// Parsed `analysis.coordinate_check`
    pub fn coordinate_check(&self) -> Result<CoordinateCheck> {
        self.analysis.coordinate_check.parse().map_err(Error::Config)
    }

    /// The location shown before the first search
    pub fn initial_location(&self) -> NamedLocation {
        NamedLocation::new(
            Coordinates::new(self.location.lat, self.location.lng),
            self.location.name.clone(),
        )
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.geocoder.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.ai.model, "gemini-1.5-flash-latest");
        assert_eq!(config.ai.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.geocoder.retries, 1);
        assert_eq!(config.analysis.coordinate_check, "falsy");
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("ai.model"), Some("gemini-1.5-flash-latest".to_string()));

        config.set("ai.model", "gemini-1.5-pro").unwrap();
        assert_eq!(config.get("ai.model"), Some("gemini-1.5-pro".to_string()));

        config.set("geocoder.timeout_secs", "5").unwrap();
        assert_eq!(config.geocoder.timeout_secs, 5);

        config.set("analysis.coordinate_check", "STRICT").unwrap();
        assert_eq!(config.coordinate_check().unwrap(), CoordinateCheck::Strict);
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("server.port", "not_a_number").is_err());
        assert!(config.set("analysis.coordinate_check", "lenient").is_err());
        assert_eq!(config.analysis.coordinate_check, "falsy");
    }

    #[test]
    fn test_every_available_key_is_readable() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "missing getter for {}", key);
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.server.port = 8080;
        config.ai.model = "gemini-test".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.server.port, 8080);
        assert_eq!(loaded.ai.model, "gemini-test");
    }

    #[test]
    fn test_load_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.ai.timeout_secs, 60);
        assert!((config.location.lat - 43.725092).abs() < 1e-9);
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        assert!(toml.contains("[server]"));
        assert!(toml.contains("[geocoder]"));
        assert!(toml.contains("[ai]"));
        assert!(toml.contains("[analysis]"));
    }

    #[test]
    fn test_api_key_from_file_when_env_unset() {
        let mut config = Config::default();
        config.ai.api_key_env = "LOC_EXPLORE_TEST_UNSET_KEY".to_string();
        assert!(config.api_key().is_none());

        config.api_keys.gemini = "file-key".to_string();
        assert_eq!(config.api_key().unwrap().expose(), "file-key");
    }

    #[test]
    fn test_api_key_env_wins() {
        let mut config = Config::default();
        config.ai.api_key_env = "LOC_EXPLORE_TEST_ENV_KEY".to_string();
        config.api_keys.gemini = "file-key".to_string();
        std::env::set_var("LOC_EXPLORE_TEST_ENV_KEY", "env-key");

        assert_eq!(config.api_key().unwrap().expose(), "env-key");
        std::env::remove_var("LOC_EXPLORE_TEST_ENV_KEY");
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_initial_location() {
        let location = Config::default().initial_location();
        assert_eq!(location.display_name, "Yonge & Lawrence, Toronto");
    }
}

//! Application configuration structs.
//!
//! Platform endpoint, source site, agent identity and the measurement table.
//! Loaded from a JSON file by [`ConfigManager`](crate::config_manager::ConfigManager);
//! CLI flags override file values.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;
use crate::models::request::DEFAULT_PLATFORM_URL;
use crate::models::site_stats::{default_measurements, Measurement};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Metrics platform settings
    #[serde(default)]
    pub platform: PlatformConfig,
    /// Monitored site settings
    #[serde(default)]
    pub source: SourceConfig,
    /// Reporting agent identity
    #[serde(default)]
    pub agent: AgentConfig,
    /// Identity shared by the reported components
    #[serde(default)]
    pub component: ComponentConfig,
    /// Measurements read from the site, in reporting order
    #[serde(default = "default_measurements")]
    pub measurements: Vec<Measurement>,
}

// ============================================================
// Platform
// ============================================================

/// Metrics platform endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// POST target
    #[serde(default = "default_platform_url")]
    pub url: String,
    /// License key; empty means "use the source key"
    #[serde(default)]
    pub license_key: String,
    /// Request timeout (milliseconds)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Skip TLS certificate verification. Test environments only.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            url: default_platform_url(),
            license_key: String::new(),
            request_timeout_ms: default_request_timeout_ms(),
            accept_invalid_certs: false,
        }
    }
}

// ============================================================
// Source site
// ============================================================

/// Site publishing the statistics document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Site base URL (e.g. "https://example.com")
    #[serde(default)]
    pub base_url: String,
    /// Key appended to the statistics path
    #[serde(default)]
    pub key: String,
    /// Path segment between the base URL and the key
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
    /// Request timeout (milliseconds)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Skip TLS certificate verification. Test environments only.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            key: String::new(),
            path_prefix: default_path_prefix(),
            request_timeout_ms: default_request_timeout_ms(),
            accept_invalid_certs: false,
        }
    }
}

// ============================================================
// Agent / component identity
// ============================================================

/// Reporting agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// FQDN of this machine
    #[serde(default)]
    pub host: String,
    /// Include this process id in the agent block
    #[serde(default)]
    pub report_pid: bool,
}

/// Name/GUID/duration reported for the site component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    #[serde(default = "default_guid")]
    pub guid: String,
    /// Reporting period (seconds)
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
    /// Used when the site does not publish `site_name`
    #[serde(default = "default_fallback_name")]
    pub fallback_name: String,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            guid: default_guid(),
            duration_secs: default_duration_secs(),
            fallback_name: default_fallback_name(),
        }
    }
}

impl AppConfig {
    /// Default configuration
    pub fn default_config() -> Self {
        Self {
            platform: PlatformConfig::default(),
            source: SourceConfig::default(),
            agent: AgentConfig::default(),
            component: ComponentConfig::default(),
            measurements: default_measurements(),
        }
    }

    /// Platform request timeout as a Duration
    pub fn platform_timeout(&self) -> Duration {
        Duration::from_millis(self.platform.request_timeout_ms)
    }

    /// Source request timeout as a Duration
    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source.request_timeout_ms)
    }

    /// License key sent to the platform; falls back to the source key
    pub fn effective_license_key(&self) -> &str {
        if self.platform.license_key.is_empty() {
            &self.source.key
        } else {
            &self.platform.license_key
        }
    }

    /// Check the settings needed before anything is fetched
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.source.base_url.trim().is_empty() {
            return Err(CoreError::Config("source base URL is not set (-u)".to_string()));
        }
        if self.source.key.trim().is_empty() {
            return Err(CoreError::Config("source key is not set (-k)".to_string()));
        }
        if self.platform.request_timeout_ms == 0 || self.source.request_timeout_ms == 0 {
            return Err(CoreError::Config("request timeouts must be positive".to_string()));
        }
        Ok(())
    }
}

fn default_platform_url() -> String {
    DEFAULT_PLATFORM_URL.to_string()
}
fn default_request_timeout_ms() -> u64 {
    30_000
}
fn default_path_prefix() -> String {
    "new-relic-rpm-plugin".to_string()
}
fn default_guid() -> String {
    "org.Drupal".to_string()
}
fn default_duration_secs() -> u64 {
    300
}
fn default_fallback_name() -> String {
    "Unknown website".to_string()
}

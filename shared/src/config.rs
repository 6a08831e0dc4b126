//! Exporter configuration: parsing, default filling and validation
//!
//! Loading happens in three explicit phases:
//! 1. [`ExporterConfig::parse`] maps the YAML document onto raw, optional fields.
//! 2. [`ExporterConfig::with_defaults`] fills every omitted optional field.
//! 3. [`DefaultedConfig::validate`] checks each field in a fixed order and
//!    stops at the first failure, producing an immutable [`Settings`].

use crate::api::null_as_default;
use crate::defaults::{default_timeout, MAX_TIMEOUT_SECONDS, MIN_TIMEOUT_SECONDS};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

// Field names as they appear in error messages and logs.
pub const COLLECT_TARGET_URL: &str = "collect_configs/target_url";
pub const COLLECT_TIMEOUT: &str = "collect_configs/timeout";
pub const ALERT_TARGET_URL: &str = "alert_config/target_url";
pub const ALERT_TIMEOUT: &str = "alert_config/timeout";
pub const NORMAL_STATE: &str = "alert_config/state_settings/normal_state";
pub const NORMAL_HEALTH: &str = "alert_config/state_settings/normal_health";

/// Raw exporter configuration as written in `exporter.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExporterConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub collect_configs: CollectConfig,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alert_config: AlertConfig,
}

/// Inventory collector settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    /// Request timeout in seconds (default: 600, min: 1, max: 36000)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
}

/// Alert endpoint settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    /// Request timeout in seconds (default: 600, min: 1, max: 36000)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state_settings: StateSettings,
}

/// Values of `status.state` and `status.health` considered healthy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_state: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_health: Option<Vec<String>>,
}

/// Configuration after default filling, with every optional timeout resolved
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultedConfig {
    pub collect_url: String,
    pub collect_timeout: i64,
    pub alert_url: String,
    pub alert_timeout: i64,
    pub normal_state: Option<Vec<String>>,
    pub normal_health: Option<Vec<String>>,
}

/// Validated, immutable settings for one sync invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub collect_url: Url,
    pub collect_timeout_seconds: u64,
    pub alert_url: Url,
    pub alert_timeout_seconds: u64,
    pub normal_states: BTreeSet<String>,
    pub normal_healths: BTreeSet<String>,
}

impl Settings {
    pub fn collect_timeout(&self) -> Duration {
        Duration::from_secs(self.collect_timeout_seconds)
    }

    pub fn alert_timeout(&self) -> Duration {
        Duration::from_secs(self.alert_timeout_seconds)
    }
}

impl ExporterConfig {
    /// Parse a YAML document into the raw configuration shape.
    pub fn parse(content: &[u8]) -> Result<Self, ConfigError> {
        serde_yaml::from_slice(content).map_err(|e| {
            error!(error = %e, "Failed to parse exporter configuration");
            ConfigError::Parse
        })
    }

    /// Fill omitted optional fields with their defaults.
    pub fn with_defaults(self) -> DefaultedConfig {
        let CollectConfig {
            target_url: collect_url,
            timeout: collect_timeout,
        } = self.collect_configs;
        let AlertConfig {
            target_url: alert_url,
            timeout: alert_timeout,
            state_settings,
        } = self.alert_config;

        DefaultedConfig {
            collect_url: collect_url.unwrap_or_default(),
            collect_timeout: timeout_or_default(COLLECT_TIMEOUT, collect_timeout),
            alert_url: alert_url.unwrap_or_default(),
            alert_timeout: timeout_or_default(ALERT_TIMEOUT, alert_timeout),
            normal_state: state_settings.normal_state,
            normal_health: state_settings.normal_health,
        }
    }
}

fn timeout_or_default(name: &str, value: Option<i64>) -> i64 {
    match value {
        Some(timeout) => timeout,
        None => {
            let timeout = default_timeout();
            warn!(
                setting = name,
                default = timeout,
                "{} was not specified in the yaml configuration file. The default value has been set.",
                name
            );
            timeout
        }
    }
}

impl DefaultedConfig {
    /// Validate every field in order, returning the first failure.
    pub fn validate(self) -> Result<Settings, ConfigError> {
        let collect_url = validate_url(COLLECT_TARGET_URL, &self.collect_url)?;
        let alert_url = validate_url(ALERT_TARGET_URL, &self.alert_url)?;
        let collect_timeout_seconds = validate_timeout(COLLECT_TIMEOUT, self.collect_timeout)?;
        let alert_timeout_seconds = validate_timeout(ALERT_TIMEOUT, self.alert_timeout)?;
        let normal_states = validate_required_set(NORMAL_STATE, self.normal_state)?;
        let normal_healths = validate_required_set(NORMAL_HEALTH, self.normal_health)?;

        Ok(Settings {
            collect_url,
            collect_timeout_seconds,
            alert_url,
            alert_timeout_seconds,
            normal_states,
            normal_healths,
        })
    }
}

/// Check that a URL setting is present and is an absolute URI.
pub fn validate_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Missing(name));
    }

    // `Url::parse` rejects relative references, so only absolute URIs pass.
    Url::parse(value).map_err(|e| {
        debug!(setting = name, error = %e, "Rejected url setting");
        ConfigError::Format(name)
    })
}

/// Check that a timeout lies within `[MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS]`.
pub fn validate_timeout(name: &'static str, value: i64) -> Result<u64, ConfigError> {
    if !(MIN_TIMEOUT_SECONDS..=MAX_TIMEOUT_SECONDS).contains(&value) {
        return Err(ConfigError::Range(name));
    }

    u64::try_from(value).map_err(|_| ConfigError::Range(name))
}

/// Check that a list setting is present and non-empty.
pub fn validate_required_set(
    name: &'static str,
    value: Option<Vec<String>>,
) -> Result<BTreeSet<String>, ConfigError> {
    let values = value.ok_or(ConfigError::Nil(name))?;
    if values.is_empty() {
        return Err(ConfigError::Blank(name));
    }

    Ok(values.into_iter().collect())
}

/// Loads exporter settings from a YAML file on every call.
///
/// Nothing is cached between calls, so edits to the file take effect on the
/// next invocation.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, parse, fill defaults and validate the configuration file.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        debug!(path = %self.path.display(), "Loading exporter configuration");

        let content = std::fs::read(&self.path).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "Failed to read exporter configuration");
            ConfigError::Read
        })?;

        let settings = ExporterConfig::parse(&content)?.with_defaults().validate()?;

        debug!(
            collect_url = %settings.collect_url,
            collect_timeout_seconds = settings.collect_timeout_seconds,
            alert_url = %settings.alert_url,
            alert_timeout_seconds = settings.alert_timeout_seconds,
            normal_states = ?settings.normal_states,
            normal_healths = ?settings.normal_healths,
            "Exporter configuration loaded"
        );

        Ok(settings)
    }
}

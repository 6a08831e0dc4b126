//! Default values and limits for configuration parameters
//!
//! This module centralizes the default policy applied to optional fields of
//! the exporter configuration file, along with the fixed identifiers the
//! exporter stamps onto outgoing alerts.

/// Default location of the exporter configuration file
pub const DEFAULT_CONFIG_PATH: &str = "configs/exporter.yaml";

/// Default HTTP listen address
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:8080";

/// Default directory for rolling log files
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// Smallest accepted timeout in seconds
pub const MIN_TIMEOUT_SECONDS: i64 = 1;

/// Largest accepted timeout in seconds (10 hours)
pub const MAX_TIMEOUT_SECONDS: i64 = 36000;

/// Default timeout for both collector and alert requests (600 seconds)
pub fn default_timeout() -> i64 {
    600
}

// Alert envelope constants

/// Status of every alert the exporter emits
pub const ALERT_STATUS: &str = "firing";

/// Instance and job label carried by every alert
pub const ALERT_SOURCE: &str = "configuration-exporter";

/// Severity label of every alert
pub const ALERT_SEVERITY: &str = "critical";

/// Alert name used when the collector reports devices it could not enumerate
pub const INCOMPLETE_DEVICE_LIST: &str = "incompleteDeviceList";

/// Alert name used when devices report a state or health outside the normal sets
pub const ABNORMAL_STATUS_DEVICE_LIST: &str = "abnormalStatusDeviceList";

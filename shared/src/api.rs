//! Wire types exchanged with the collector, the alert endpoint and callers
//!
//! Inventory records are owned by the upstream collector, so they are kept as
//! open JSON objects (with insertion order preserved) and passed through to the
//! caller untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::defaults::{ALERT_SEVERITY, ALERT_SOURCE, ALERT_STATUS};

/// Route constants for the exporter HTTP API
pub mod endpoints {
    /// Base path of the v1 API
    pub const API_BASE_V1: &str = "/cdim/api/v1";
    /// Inventory synchronization trigger
    pub const DEVICES_SYNC: &str = "/cdim/api/v1/devices/sync";
    /// Liveness probe
    pub const HEALTH: &str = "/health";
}

/// One hardware-control resource as reported by the collector.
pub type Resource = Map<String, Value>;

/// Response body of the collector's bulk inventory endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryResponse {
    #[serde(rename = "deviceList", default, deserialize_with = "null_as_default")]
    pub devices: Vec<Resource>,
    #[serde(
        rename = "incompleteDeviceList",
        default,
        deserialize_with = "null_as_default"
    )]
    pub incomplete_devices: Vec<Value>,
    #[serde(rename = "infoTimestamp", default, deserialize_with = "null_as_default")]
    pub timestamp: String,
}

/// Treats an explicit JSON `null` the same as an omitted field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Labels attached to an alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertLabels {
    pub alertname: String,
    pub instance: String,
    pub job: String,
    pub severity: String,
}

/// Free-form annotations attached to an alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertAnnotations {
    pub description: String,
}

/// A single alert in the alert endpoint's wire format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertContent {
    pub status: String,
    pub labels: AlertLabels,
    pub annotations: AlertAnnotations,
}

impl AlertContent {
    /// Builds the one-element envelope posted to the alert endpoint.
    pub fn envelope(alert_name: &str, description: String) -> Vec<AlertContent> {
        vec![AlertContent {
            status: ALERT_STATUS.to_string(),
            labels: AlertLabels {
                alertname: alert_name.to_string(),
                instance: ALERT_SOURCE.to_string(),
                job: ALERT_SOURCE.to_string(),
                severity: ALERT_SEVERITY.to_string(),
            },
            annotations: AlertAnnotations { description },
        }]
    }
}

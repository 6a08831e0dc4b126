//! Resource status classification
//!
//! A resource is normal when its `status.state` is one of the configured
//! normal states and its `status.health` is one of the configured normal
//! healths. Anything missing or of the wrong type counts as abnormal.

use crate::api::Resource;
use crate::config::Settings;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::warn;

/// Returns `true` if the resource's status is normal, `false` otherwise.
pub fn classify(resource: &Resource, settings: &Settings) -> bool {
    let Some(Value::Object(status)) = resource.get("status") else {
        warn!("status does not exist or the value is not a Map.");
        return false;
    };

    field_is_normal("state", status, &settings.normal_states)
        && field_is_normal("health", status, &settings.normal_healths)
}

fn field_is_normal(key: &str, status: &Resource, normal: &BTreeSet<String>) -> bool {
    match status.get(key) {
        Some(Value::String(value)) => normal.contains(value),
        _ => {
            warn!(
                field = key,
                "status.{} does not exist or the value is not a String.", key
            );
            false
        }
    }
}

//! Bulk inventory retrieval from the collector endpoint
//!
//! One GET per sync, no retries. Each failure stage maps onto its own
//! [`FetchError`] so callers can tell an unreachable collector from one that
//! answered with garbage.

use exporter_shared::{FetchError, InventoryResponse};
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

/// Client for the collector's bulk inventory endpoint
#[derive(Debug, Clone)]
pub struct InventoryClient {
    client: reqwest::Client,
}

impl InventoryClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch and decode the full inventory.
    pub async fn fetch(&self, url: &Url, timeout: Duration) -> Result<InventoryResponse, FetchError> {
        debug!(url = %url, timeout_seconds = timeout.as_secs(), "Requesting device inventory");

        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Inventory request failed");
                FetchError::RequestFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(url = %url, status = %status, "Collector returned an error status");
            return Err(FetchError::CollectFailed);
        }

        let body = response.bytes().await.map_err(|e| {
            error!(url = %url, error = %e, "Failed to read inventory response body");
            FetchError::ResponseRead
        })?;

        let inventory: InventoryResponse = serde_json::from_slice(&body).map_err(|e| {
            error!(url = %url, error = %e, "Failed to decode inventory response");
            FetchError::ResponseDecode
        })?;

        info!(
            devices = inventory.devices.len(),
            incomplete_devices = inventory.incomplete_devices.len(),
            info_timestamp = %inventory.timestamp,
            "Device inventory received"
        );

        Ok(inventory)
    }
}

//! Device synchronization pipeline
//!
//! Loads the configuration, pulls the inventory, raises alerts for incomplete
//! and abnormal devices, and hands the full device list back to the caller.

use crate::alert::AlertDispatcher;
use crate::collector::InventoryClient;
use exporter_shared::defaults::{ABNORMAL_STATUS_DEVICE_LIST, INCOMPLETE_DEVICE_LIST};
use exporter_shared::{classify, ConfigStore, PipelineError, Resource};
use tracing::{info, warn};

/// Runs one sync invocation end to end
#[derive(Debug, Clone)]
pub struct SyncPipeline {
    config_store: ConfigStore,
    client: reqwest::Client,
}

impl SyncPipeline {
    pub fn new(config_store: ConfigStore, client: reqwest::Client) -> Self {
        Self {
            config_store,
            client,
        }
    }

    /// Execute the pipeline.
    ///
    /// Configuration and fetch failures are terminal and returned as-is.
    /// Alerts are spawned in the background and never affect the result.
    pub async fn run(&self) -> Result<Vec<Resource>, PipelineError> {
        let settings = self.config_store.load()?;

        let inventory = InventoryClient::new(self.client.clone())
            .fetch(&settings.collect_url, settings.collect_timeout())
            .await?;

        let dispatcher = AlertDispatcher::new(self.client.clone(), &settings);

        if inventory.incomplete_devices.is_empty() {
            info!("{} not existed. Not send an alert notification.", INCOMPLETE_DEVICE_LIST);
        } else {
            warn!(
                count = inventory.incomplete_devices.len(),
                "{} existed. Send an alert notification.", INCOMPLETE_DEVICE_LIST
            );
            dispatcher.dispatch(INCOMPLETE_DEVICE_LIST, inventory.incomplete_devices);
        }

        let (resources, abnormal) = partition(inventory.devices, |device| {
            classify(device, &settings)
        });

        if abnormal.is_empty() {
            info!(
                "{} not existed. Not send an alert notification.",
                ABNORMAL_STATUS_DEVICE_LIST
            );
        } else {
            warn!(
                count = abnormal.len(),
                "{} existed. Send an alert notification.", ABNORMAL_STATUS_DEVICE_LIST
            );
            dispatcher.dispatch(ABNORMAL_STATUS_DEVICE_LIST, abnormal);
        }

        Ok(resources)
    }
}

/// Keep every device in arrival order and copy the abnormal ones aside.
pub fn partition<F>(devices: Vec<Resource>, is_normal: F) -> (Vec<Resource>, Vec<Resource>)
where
    F: Fn(&Resource) -> bool,
{
    let abnormal = devices
        .iter()
        .filter(|device| !is_normal(*device))
        .cloned()
        .collect();
    (devices, abnormal)
}

//! Fire-and-forget alert delivery
//!
//! Each dispatch runs as a detached tokio task. The sync request never waits
//! for it and never learns how it ended; failures only show up in the logs.

use exporter_shared::{AlertContent, Settings};
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

/// Reasons an alert post can fail
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Failed to marshal alert items: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("post has failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("alert endpoint returned status {0}")]
    Status(StatusCode),
}

/// Posts alert envelopes to the configured alert endpoint
#[derive(Debug, Clone)]
pub struct AlertDispatcher {
    client: reqwest::Client,
    target_url: Url,
    timeout: Duration,
}

impl AlertDispatcher {
    pub fn new(client: reqwest::Client, settings: &Settings) -> Self {
        Self {
            client,
            target_url: settings.alert_url.clone(),
            timeout: settings.alert_timeout(),
        }
    }

    /// Spawn a detached task that posts one alert carrying all of `items`.
    ///
    /// Returns immediately. The task owns everything it needs, so it keeps
    /// running after the triggering request has been answered.
    pub fn dispatch<T>(&self, alert_name: &'static str, items: Vec<T>)
    where
        T: Serialize + Send + Sync + 'static,
    {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            if let Err(e) = dispatcher.post_alert(alert_name, &items).await {
                error!(alert_name, error = %e, "Alert notification failed");
            }
        });
    }

    /// Serialize `items` into an alert envelope and post it.
    pub async fn post_alert<T: Serialize>(
        &self,
        alert_name: &str,
        items: &[T],
    ) -> Result<(), DispatchError> {
        info!(alert_name, "Starting the post.");

        let description = serde_json::to_string(items).map_err(|e| {
            error!(alert_name, error = %e, "Failed to marshal for 'annotations'.");
            e
        })?;
        let envelope = AlertContent::envelope(alert_name, description);
        let body = serde_json::to_string(&envelope)?;

        let response = self
            .client
            .post(self.target_url.clone())
            .timeout(self.timeout)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.clone())
            .send()
            .await
            .map_err(|e| {
                error!(alert_name, url = %self.target_url, alert = %body, "post has failed.");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(alert_name, url = %self.target_url, status = %status, alert = %body, "post was rejected.");
            return Err(DispatchError::Status(status));
        }

        info!(alert_name, alert = %body, "post has been completed.");
        Ok(())
    }
}

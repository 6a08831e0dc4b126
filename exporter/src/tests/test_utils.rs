//! Loopback stand-ins for the collector and alert endpoints
//!
//! These helpers are only used in tests and are not part of the public API.

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use url::Url;

pub const INVENTORY_PATH: &str = "/cdim/api/v1/devices";
pub const ALERT_PATH: &str = "/api/v2/alerts";

/// How long tests wait for a background alert before giving up.
pub const ALERT_WAIT: Duration = Duration::from_secs(5);

/// How long tests wait before concluding that no alert was sent.
pub const NO_ALERT_WAIT: Duration = Duration::from_millis(300);

#[derive(Clone)]
struct UpstreamState {
    inventory_status: StatusCode,
    inventory_body: Arc<String>,
    inventory_hits: Arc<AtomicUsize>,
    alert_status: StatusCode,
    alert_tx: mpsc::UnboundedSender<Value>,
}

/// A running fake collector and alert endpoint on one loopback port
pub struct Upstream {
    pub addr: SocketAddr,
    inventory_hits: Arc<AtomicUsize>,
    alerts: mpsc::UnboundedReceiver<Value>,
}

impl Upstream {
    /// Start a server answering inventory GETs with `inventory_status` and
    /// `inventory_body`, and alert POSTs with `alert_status`.
    pub async fn start(
        inventory_status: StatusCode,
        inventory_body: impl Into<String>,
        alert_status: StatusCode,
    ) -> Self {
        let (alert_tx, alerts) = mpsc::unbounded_channel();
        let inventory_hits = Arc::new(AtomicUsize::new(0));
        let state = UpstreamState {
            inventory_status,
            inventory_body: Arc::new(inventory_body.into()),
            inventory_hits: Arc::clone(&inventory_hits),
            alert_status,
            alert_tx,
        };

        let router = Router::new()
            .route(INVENTORY_PATH, get(serve_inventory))
            .route(ALERT_PATH, post(receive_alert))
            .route("/slow", get(serve_slowly))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            addr,
            inventory_hits,
            alerts,
        }
    }

    /// Convenience constructor: healthy endpoints serving `inventory`.
    pub async fn serving(inventory: Value) -> Self {
        Self::start(StatusCode::OK, inventory.to_string(), StatusCode::OK).await
    }

    pub fn url(&self, path: &str) -> Url {
        Url::parse(&format!("http://{}{}", self.addr, path)).unwrap()
    }

    pub fn inventory_url(&self) -> Url {
        self.url(INVENTORY_PATH)
    }

    pub fn alert_url(&self) -> Url {
        self.url(ALERT_PATH)
    }

    pub fn inventory_hits(&self) -> usize {
        self.inventory_hits.load(Ordering::SeqCst)
    }

    /// Wait for the next alert body posted to the alert endpoint.
    pub async fn next_alert(&mut self) -> Value {
        tokio::time::timeout(ALERT_WAIT, self.alerts.recv())
            .await
            .expect("timed out waiting for alert")
            .expect("alert channel closed")
    }

    /// Collect every alert that arrives within `NO_ALERT_WAIT`.
    pub async fn drain_alerts(&mut self) -> Vec<Value> {
        let mut alerts = Vec::new();
        while let Ok(Some(alert)) = tokio::time::timeout(NO_ALERT_WAIT, self.alerts.recv()).await
        {
            alerts.push(alert);
        }
        alerts
    }

    /// Write an exporter configuration pointing at this upstream.
    pub fn config_file(&self) -> NamedTempFile {
        write_config(&config_yaml(
            self.inventory_url().as_str(),
            self.alert_url().as_str(),
        ))
    }
}

async fn serve_inventory(State(state): State<UpstreamState>) -> impl IntoResponse {
    state.inventory_hits.fetch_add(1, Ordering::SeqCst);
    (
        state.inventory_status,
        [(CONTENT_TYPE, "application/json")],
        state.inventory_body.as_str().to_owned(),
    )
}

async fn receive_alert(
    State(state): State<UpstreamState>,
    Json(body): Json<Value>,
) -> StatusCode {
    let _ = state.alert_tx.send(body);
    state.alert_status
}

async fn serve_slowly() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "{}"
}

/// Exporter configuration with normal sets `{Enabled, Qualified}` / `{OK, Warning}`.
pub fn config_yaml(collect_url: &str, alert_url: &str) -> String {
    format!(
        r#"
collect_configs:
  target_url: {collect_url}
  timeout: 5
alert_config:
  target_url: {alert_url}
  timeout: 5
  state_settings:
    normal_state:
      - Enabled
      - Qualified
    normal_health:
      - OK
      - Warning
"#
    )
}

pub fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, content.as_bytes()).unwrap();
    file
}

/// An address with nothing listening on it.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A server that promises a longer body than it sends, then hangs up.
pub async fn truncating_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0_u8; 4096];
            let _ = tokio::io::AsyncReadExt::read(&mut socket, &mut buf).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 1000\r\n\r\n{\"deviceList\": [",
                )
                .await;
            let _ = socket.shutdown().await;
        }
    });
    addr
}

//! REST API for the configuration exporter
//!
//! Exposes the device sync trigger and a liveness probe, wrapped in CORS and
//! an audit-trail layer that records the start and end of every request.
// Handlers stay thin: all sync logic lives in `crate::pipeline`, the API only
// turns its outcome into an HTTP response.

use crate::pipeline::SyncPipeline;
use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, ORIGIN},
        Method, StatusCode,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use exporter_shared::{api::endpoints, PipelineError, Resource};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Log target for request/response audit lines
pub const AUDIT_TRAIL_TARGET: &str = "audit_trail";

/// Application state shared across all API handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: SyncPipeline,
}

impl AppState {
    pub fn new(pipeline: SyncPipeline) -> Self {
        Self { pipeline }
    }
}

/// Creates the API router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(health_check))
        .route(endpoints::DEVICES_SYNC, post(sync_devices))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(audit_trail))
                .layer(cors_layer()),
        )
        .with_state(state)
}

/// Permissive CORS: any origin, the usual REST methods and headers.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, CONTENT_LENGTH, CONTENT_TYPE, AUTHORIZATION])
}

/// Records the start and end of every request on the audit trail.
async fn audit_trail(request: Request, next: Next) -> Response {
    info!(
        target: AUDIT_TRAIL_TARGET,
        method = %request.method(),
        path = %request.uri().path(),
        "request start."
    );

    let response = next.run(request).await;

    info!(
        target: AUDIT_TRAIL_TARGET,
        status = response.status().as_u16(),
        "response end."
    );
    response
}

/// The handler for the `/health` endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "configuration-exporter",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Pulls the device inventory and returns every device, normal or not.
async fn sync_devices(State(state): State<AppState>) -> Result<Json<Vec<Resource>>, ApiError> {
    info!("{}[POST] start.", endpoints::DEVICES_SYNC);

    let resources = state.pipeline.run().await.map_err(|e| {
        error!(code = e.code, status = e.status, "{}", e);
        ApiError(e)
    })?;

    info!(
        devices = resources.len(),
        "{}[POST] completed successfully.",
        endpoints::DEVICES_SYNC
    );
    Ok(Json(resources))
}

/// A failed sync, rendered as `{ "code": ..., "message": ... }`.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub PipelineError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.body())).into_response()
    }
}

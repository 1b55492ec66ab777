//! HTTP adapter over the Chroma core.
//!
//! Provides endpoints for:
//! - `GET /` - Welcome text
//! - `POST /process_data` - Multipart upload (`image` file, optional `depth`)
//! - `GET /filter_by_depth?depth_min=&depth_max=` - Records in a depth range
//! - `GET /health` - Health check
//!
//! Handlers only translate HTTP to core calls. Pipeline runs and queries are
//! blocking, so they run on the blocking thread pool.

use axum::{
    extract::{DefaultBodyLimit, Extension, Multipart, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chroma_core::{Chroma, ChromaError, ImageRecord};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared state for the HTTP server.
pub struct ServerState {
    pub chroma: Chroma,
}

/// Query string for `/filter_by_depth`. Values stay strings so that a
/// missing or non-numeric bound gets the same 400 answer.
#[derive(Debug, Deserialize)]
pub struct FilterParams {
    pub depth_min: Option<String>,
    pub depth_max: Option<String>,
}

impl FilterParams {
    fn bounds(&self) -> Option<(i64, i64)> {
        let parse = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<i64>().ok());
        Some((parse(&self.depth_min)?, parse(&self.depth_max)?))
    }
}

/// Response body for `/process_data`.
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub message: String,
    pub processed_image_path: String,
    pub colormap_image_path: String,
    pub metadata_stored: String,
    pub height: u32,
    pub width: u32,
    pub depth: i64,
}

impl From<ImageRecord> for ProcessResponse {
    fn from(record: ImageRecord) -> Self {
        Self {
            message: "Image uploaded and processed successfully".to_string(),
            processed_image_path: record.processed_path,
            colormap_image_path: record.colormap_path,
            metadata_stored: "Yes".to_string(),
            height: record.height,
            width: record.width,
            depth: record.depth,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Status for a failed pipeline run: bad input is the client's problem.
fn pipeline_status(err: &ChromaError) -> StatusCode {
    match err.pipeline_error() {
        Some(e) if e.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET / - Welcome text
async fn index_handler() -> &'static str {
    "Welcome to the Chroma image processing API. Use /process_data to upload and process \
     images, or /filter_by_depth to filter images by depth range."
}

/// POST /process_data - Resize, colormap and record an uploaded image
async fn process_data_handler(
    Extension(state): Extension<Arc<ServerState>>,
    mut multipart: Multipart,
) -> Response {
    let mut upload = None;
    let mut depth = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_response(e.status(), e.body_text()),
        };
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                match field.bytes().await {
                    Ok(bytes) => upload = Some((filename, bytes)),
                    Err(e) => return error_response(e.status(), e.body_text()),
                }
            }
            Some("depth") => {
                let text = match field.text().await {
                    Ok(text) => text,
                    Err(e) => return error_response(e.status(), e.body_text()),
                };
                match text.trim().parse::<i64>() {
                    Ok(value) => depth = Some(value),
                    Err(_) => {
                        return error_response(StatusCode::BAD_REQUEST, "'depth' must be an integer")
                    }
                }
            }
            _ => {}
        }
    }

    let Some((filename, bytes)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "Missing 'image' file field");
    };

    info!(filename = %filename, size = bytes.len(), depth = ?depth, "Received upload");

    let result = tokio::task::spawn_blocking(move || {
        state.chroma.run_pipeline(&bytes, &filename, depth)
    })
    .await;

    match result {
        Ok(Ok(record)) => (StatusCode::OK, Json(ProcessResponse::from(record))).into_response(),
        Ok(Err(e)) => {
            let status = pipeline_status(&e);
            warn!(error = %e, status = status.as_u16(), "Upload processing failed");
            error_response(status, e.to_string())
        }
        Err(e) => {
            error!(error = %e, "Pipeline task panicked");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

/// GET /filter_by_depth - Records whose depth is within the given bounds
async fn filter_by_depth_handler(
    Extension(state): Extension<Arc<ServerState>>,
    Query(params): Query<FilterParams>,
) -> Response {
    let Some((min, max)) = params.bounds() else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Both 'depth_min' and 'depth_max' are required",
        );
    };

    let result =
        tokio::task::spawn_blocking(move || state.chroma.query_by_depth_range(min, max)).await;

    match result {
        Ok(Ok(records)) if records.is_empty() => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "No images found for the given depth range" })),
        )
            .into_response(),
        Ok(Ok(records)) => (StatusCode::OK, Json(records)).into_response(),
        Ok(Err(e)) => {
            error!(error = %e, "Depth query failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            error!(error = %e, "Query task panicked");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

/// GET /health - Health check
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "chroma".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the HTTP router.
pub fn build_router(state: Arc<ServerState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/process_data", post(process_data_handler))
        .route("/filter_by_depth", get(filter_by_depth_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn start_server(
    state: Arc<ServerState>,
    addr: &str,
    max_upload_bytes: usize,
) -> anyhow::Result<()> {
    let app = build_router(state, max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Starting chroma HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

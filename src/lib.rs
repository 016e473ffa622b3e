pub mod chart;
pub mod config;
pub mod map;
pub mod processing;
pub mod session;
pub mod templates;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use processing::{TelemetryError, process_csv_bytes};
use serde::Deserialize;
use session::Controller;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use templates::{render_landing_page, render_session_page};
use uuid::Uuid;

/// Shared handle to the single visualization controller.
#[derive(Clone, Default)]
pub struct AppState {
    controller: Arc<Mutex<Controller>>,
}

impl AppState {
    fn controller(&self) -> MutexGuard<'_, Controller> {
        self.controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Deserialize)]
pub struct HoverRequest {
    /// Session whose chart produced the hover.
    pub session: Uuid,
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct DisplayRequest {
    pub enabled: bool,
}

pub fn build_app() -> Router {
    build_app_with_state(AppState::default())
}

pub fn build_app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing_page))
        .route("/upload", post(handle_upload))
        .route("/hover", post(handle_hover))
        .route("/map/display", post(handle_map_display))
        .route("/session", get(current_session))
        .with_state(state)
}

async fn landing_page() -> Html<String> {
    Html(render_landing_page())
}

async fn handle_upload(State(state): State<AppState>, mut multipart: Multipart) -> impl IntoResponse {
    let mut uploaded: Option<Vec<u8>> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            match field.bytes().await {
                Ok(bytes) => {
                    uploaded = Some(bytes.to_vec());
                }
                Err(err) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read uploaded file: {err}"),
                    )
                        .into_response();
                }
            }
        }
    }

    let file_bytes = match uploaded {
        Some(bytes) => bytes,
        None => return (StatusCode::BAD_REQUEST, "No file provided").into_response(),
    };
    tracing::info!(bytes = file_bytes.len(), "received telemetry upload");

    let processed = match process_csv_bytes(&file_bytes) {
        Ok(processed) => processed,
        Err(err) => return render_processing_error(err),
    };

    let mut controller = state.controller();
    controller.load(processed);
    match controller.snapshot() {
        Some(snapshot) => Html(render_session_page(&snapshot)).into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "Session was not loaded").into_response(),
    }
}

async fn handle_hover(
    State(state): State<AppState>,
    Json(request): Json<HoverRequest>,
) -> impl IntoResponse {
    match state.controller().hover(request.session, request.index) {
        Some(update) => Json(update).into_response(),
        None => (
            StatusCode::CONFLICT,
            "Hover does not belong to the loaded telemetry session",
        )
            .into_response(),
    }
}

async fn handle_map_display(
    State(state): State<AppState>,
    Json(request): Json<DisplayRequest>,
) -> impl IntoResponse {
    match state.controller().set_map_display(request.enabled) {
        Some(update) => Json(update).into_response(),
        None => no_session(StatusCode::CONFLICT),
    }
}

async fn current_session(State(state): State<AppState>) -> impl IntoResponse {
    match state.controller().snapshot() {
        Some(snapshot) => Json(snapshot).into_response(),
        None => no_session(StatusCode::NOT_FOUND),
    }
}

fn no_session(status: StatusCode) -> axum::response::Response {
    (status, "No telemetry file has been loaded").into_response()
}

fn render_processing_error(error: TelemetryError) -> axum::response::Response {
    tracing::warn!(%error, "rejecting telemetry upload");
    (StatusCode::BAD_REQUEST, error.to_string()).into_response()
}

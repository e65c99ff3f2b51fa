//! Request handlers for the video task API.

use crate::server::envelope::{ApiError, Envelope};
use crate::server::AppState;
use crate::video::{GenerationRequest, Task};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;

/// Body of `POST /api/v1/videos/tasks`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskBody {
    /// Text prompt (also accepted as `text_prompt`).
    #[serde(alias = "text_prompt")]
    pub prompt: String,
    /// Optional first-frame image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Optional duration in seconds.
    #[serde(default)]
    pub duration: Option<u32>,
    /// Optional audio generation flag.
    #[serde(default)]
    pub generate_audio: Option<bool>,
}

impl From<CreateTaskBody> for GenerationRequest {
    fn from(body: CreateTaskBody) -> Self {
        let mut request = GenerationRequest::new(body.prompt);
        if let Some(url) = body.image_url {
            request = request.with_image_url(url);
        }
        request.duration_secs = body.duration;
        request.generate_audio = body.generate_audio;
        request
    }
}

fn encode(task: &Task) -> Result<Value, ApiError> {
    serde_json::to_value(task).map_err(|e| {
        tracing::error!(task_id = %task.id, error = %e, "failed to encode task");
        ApiError::Unexpected("failed to encode task".into())
    })
}

/// Creates a generation task and returns it wrapped in an envelope.
#[instrument(skip_all)]
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<CreateTaskBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let request = GenerationRequest::from(body);

    let task = state.provider.create_task(&request).await?;
    tracing::info!(
        provider = %state.provider.kind(),
        task_id = %task.id,
        status = %task.status,
        "task created"
    );

    let data = encode(&task)?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok("Video generation task created", data)),
    ))
}

/// Returns the provider's current view of a task.
#[instrument(skip(state))]
pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let task = state.provider.get_task(&task_id).await?;
    let data = encode(&task)?;
    Ok((StatusCode::OK, Json(Envelope::ok("ok", data))))
}

/// Liveness of the video service; independent of provider reachability.
#[instrument(skip_all)]
pub async fn videos_health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "video_generation",
            "message": "Service is running normally"
        })),
    )
}

/// Process-wide health check.
#[instrument(skip_all)]
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "message": "API is running normally" })),
    )
}

/// Welcome document.
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Welcome to the video generation API",
        "health": "/api/v1/videos/health"
    }))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

//! HTTP API for video generation tasks.
//!
//! | Route | Handler |
//! |---|---|
//! | `POST /api/v1/videos/tasks` | create a task (201) |
//! | `GET /api/v1/videos/tasks/{task_id}` | current task state |
//! | `GET /api/v1/videos/health` | service liveness |
//! | `GET /health`, `GET /` | process liveness, welcome |

pub mod envelope;
mod handlers;

pub use envelope::{status_for, ApiError, Envelope};
pub use handlers::CreateTaskBody;

use crate::video::TaskProvider;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared, read-only state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Provider client used for every request.
    pub provider: Arc<dyn TaskProvider>,
}

impl AppState {
    /// Creates a new API state.
    pub fn new(provider: Arc<dyn TaskProvider>) -> Self {
        Self { provider }
    }
}

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/v1/videos/health", get(handlers::videos_health))
        .route("/api/v1/videos/tasks", post(handlers::create_task))
        .route("/api/v1/videos/tasks/:task_id", get(handlers::get_task))
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, provider = %state.provider.name(), "video API listening");
    }
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

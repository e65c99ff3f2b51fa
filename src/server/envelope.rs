//! Uniform `{code, message, data}` response envelope and error mapping.

use crate::error::VidGenError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Wrapper returned by every task endpoint, on success and on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// `0` on success, the HTTP status code otherwise.
    pub code: u16,
    /// Human-readable outcome.
    pub message: String,
    /// Payload; `null` on failure.
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Successful envelope.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            code: 0,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Maps a domain error to the status code returned to callers.
pub fn status_for(err: &VidGenError) -> StatusCode {
    match err {
        VidGenError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
        VidGenError::ConnectionFailure(_) | VidGenError::Timeout(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        VidGenError::GenerationFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error returned by handlers.
#[derive(Debug)]
pub enum ApiError {
    /// A classified domain error.
    Domain(VidGenError),
    /// Anything that escaped classification.
    Unexpected(String),
    /// No route matched.
    NotFound,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Domain(err) => status_for(err),
            Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Message placed in the envelope.
    pub fn message(&self) -> String {
        match self {
            Self::Domain(err) => err.to_string(),
            Self::Unexpected(detail) => format!("unexpected error: {detail}"),
            Self::NotFound => "route not found".to_string(),
        }
    }
}

impl From<VidGenError> for ApiError {
    fn from(err: VidGenError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "rejected request body");
        let message = match rejection {
            JsonRejection::JsonDataError(_) => "request body is missing a field or has a field of the wrong type",
            JsonRejection::JsonSyntaxError(_) => "request body is not valid JSON",
            JsonRejection::MissingJsonContentType(_) => "request body must be sent as application/json",
            _ => "request body could not be read",
        };
        Self::Domain(VidGenError::InvalidParameter(message.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        match &self {
            Self::Domain(err) if status.is_server_error() => {
                tracing::error!(kind = err.kind(), status = status.as_u16(), "{message}");
            }
            Self::Unexpected(_) => {
                tracing::error!(status = status.as_u16(), "{message}");
            }
            _ => tracing::info!(status = status.as_u16(), "{message}"),
        }

        let body: Envelope<()> = Envelope {
            code: status.as_u16(),
            message,
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

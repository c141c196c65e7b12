use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use docchat_auth::GateError;
use docchat_rag::{IngestError, RagError};

/// Structured error response: a stable machine-readable kind plus a
/// human-readable message. Rate-limit rejections additionally carry the
/// configured limits so clients can compute backoff.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_secs: Option<u64>,
}

impl ApiError {
    fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                kind,
                message: message.into(),
                limit: None,
                window_secs: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl<E> From<GateError<E>> for ApiError
where
    E: Into<ApiError> + std::error::Error,
{
    fn from(err: GateError<E>) -> Self {
        match err {
            // Both credential failures map to the same user-visible outcome;
            // the upstream detail stays in the logs.
            GateError::Unauthenticated(_) => ApiError::new(
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "missing or invalid Authorization header",
            ),
            GateError::InvalidCredential(_) => ApiError::new(
                StatusCode::UNAUTHORIZED,
                "invalid_credential",
                "invalid or expired credential",
            ),
            GateError::RateLimited { limit, window_secs } => {
                let mut error = ApiError::new(
                    StatusCode::TOO_MANY_REQUESTS,
                    "rate_limited",
                    format!(
                        "Rate limit exceeded. Max {limit} requests per {window_secs} seconds."
                    ),
                );
                error.body.limit = Some(limit);
                error.body.window_secs = Some(window_secs);
                error
            }
            GateError::Operation(inner) => inner.into(),
        }
    }
}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        let kind = match &err {
            RagError::RetrievalUnavailable(_) => "retrieval_unavailable",
            RagError::GenerationUnavailable(_) => "generation_unavailable",
        };
        ApiError::new(StatusCode::SERVICE_UNAVAILABLE, kind, err.to_string())
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        ApiError::new(StatusCode::BAD_GATEWAY, "ingestion_failed", err.to_string())
    }
}

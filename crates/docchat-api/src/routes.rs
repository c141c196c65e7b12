use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/analyse", post(analyse))
        .with_state(state)
}

// ── Health ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness probe; unauthenticated, no side effects.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ── Chat ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let auth = auth_header(&headers);
    let pipeline = state.pipeline.clone();
    let query = request.query;
    let answer = state
        .gate
        .guard(auth, move |claims| async move {
            info!(subject = %claims.subject, "chat request");
            pipeline.answer(&query).await
        })
        .await
        .map_err(|err| {
            warn!(error = %err, operation = "chat", "request refused or failed");
            ApiError::from(err)
        })?;
    Ok(Json(ChatResponse { answer }))
}

// ── Analyse ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AnalyseRequest {
    pub pdf_urls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyseResponse {
    pub message: String,
}

pub async fn analyse(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AnalyseRequest>,
) -> Result<Json<AnalyseResponse>, ApiError> {
    let auth = auth_header(&headers);
    let ingest = state.ingest.clone();
    let pdf_urls = request.pdf_urls;
    let message = state
        .gate
        .guard(auth, move |claims| async move {
            info!(subject = %claims.subject, count = pdf_urls.len(), "analyse request");
            ingest.analyse(&pdf_urls).await
        })
        .await
        .map_err(|err| {
            warn!(error = %err, operation = "analyse", "request refused or failed");
            ApiError::from(err)
        })?;
    Ok(Json(AnalyseResponse { message }))
}

fn auth_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

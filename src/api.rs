//! HTTP API for the chat UI
//!
//! - POST /api/chat   { "message": "..." } -> { "response", "chartData", "report"? }
//! - GET  /api/health

use crate::assistant::{AnalyticsAssistant, MESSAGE_REQUIRED};
use crate::error::AnalyticsError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info_span, warn, Instrument};
use uuid::Uuid;

pub const GENERIC_FAILURE: &str = "Failed to process your request. Please try again.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

pub fn router(assistant: Arc<AnalyticsAssistant>) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(assistant)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "service": "dealer-insights"}))
}

async fn chat_handler(
    State(assistant): State<Arc<AnalyticsAssistant>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(rejection),
    };

    let message = match request.message {
        Some(message) if !message.trim().is_empty() => message,
        _ => return error_response(StatusCode::BAD_REQUEST, MESSAGE_REQUIRED),
    };

    let span = info_span!("chat", request_id = %Uuid::new_v4());
    match assistant.answer(&message).instrument(span).await {
        Ok(answer) => Json(answer).into_response(),
        Err(AnalyticsError::Validation(reason)) => error_response(StatusCode::BAD_REQUEST, &reason),
        Err(e) => {
            error!("❌ Chat request failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE)
        }
    }
}

/// Body rejections still answer with the JSON error envelope. A body that parses
/// but carries no usable `message` is a client error, anything else is a failure.
fn rejection_response(rejection: JsonRejection) -> Response {
    warn!("Rejected chat request body: {}", rejection.body_text());
    match rejection {
        JsonRejection::JsonDataError(_) => error_response(StatusCode::BAD_REQUEST, MESSAGE_REQUIRED),
        _ => error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

//! HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use coin_context::{ChatRequest, ChatResponse};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, detail: String, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            detail,
            code: code.into(),
        }),
    )
}

/// Chat endpoint: reply plus the coin data that informed it
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!("Rejected chat request: {}", rejection.body_text());
        api_error(rejection.status(), rejection.body_text(), "INVALID_REQUEST")
    })?;

    state.chat.respond(&request).await.map(Json).map_err(|e| {
        tracing::error!("Chat error: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.detail(), "CHAT_ERROR")
    })
}

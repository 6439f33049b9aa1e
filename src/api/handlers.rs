use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::menu::MenuReply;
use crate::AppState;

use super::models::{AskRequest, AskResponse, ErrorResponse, HealthResponse, MenuRequest};

pub async fn ask(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Json<AskResponse> {
    let reply = state.engine.lookup(payload.message.as_deref());
    tracing::debug!(matched = ?reply.matched, "answered message");

    Json(AskResponse {
        answer: reply.text.to_string(),
        matched: reply.matched.map(str::to_string),
    })
}

pub async fn menu(
    State(state): State<AppState>,
    Json(payload): Json<MenuRequest>,
) -> Json<MenuReply> {
    let reply = match payload.selection.as_deref() {
        None => state.menu.start(),
        Some(selection) => state.menu.select(&payload.path, selection),
    };
    Json(reply)
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        entries: state.engine.table().len(),
    })
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "route not found".to_string(),
        }),
    )
        .into_response()
}

mod handlers;
mod models;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::AppState;

#[allow(unused_imports)]
pub use handlers::{ask, health, menu, not_found};
#[allow(unused_imports)]
pub use models::{AskRequest, AskResponse, ErrorResponse, HealthResponse, MenuRequest};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ask", post(ask))
        .route("/menu", post(menu))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

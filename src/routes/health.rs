use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let providers: Vec<&str> = state
        .ai_service
        .provider_kinds()
        .iter()
        .map(|p| p.as_str())
        .collect();

    let body = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "aiProviders": providers,
    });
    (StatusCode::OK, Json(body))
}

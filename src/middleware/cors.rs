use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// The authoring front end calls both endpoints from the browser.
pub fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any)
}

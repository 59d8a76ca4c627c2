use axum::{extract::DefaultBodyLimit, routing::get, Router};
use exam_assist_backend::{
    config::{get_config, init_config},
    middleware::cors::api_cors,
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Room for multipart framing on top of the largest accepted file.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    init_config()?;
    let config = get_config()?;

    let app_state = AppState::new(config)?;
    info!(
        providers = ?app_state.ai_service.provider_kinds(),
        template_fallback = config.template_fallback_enabled,
        "AI providers configured"
    );

    let app = Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/generate-questions",
            get(routes::generation::generation_info).post(routes::generation::generate_questions),
        )
        .route(
            "/extract-text",
            get(routes::extraction::extraction_info).post(routes::extraction::extract_text),
        )
        .with_state(app_state)
        .layer(api_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(
            config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
        ));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

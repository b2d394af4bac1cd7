//! Axum router configuration with middleware.
//!
//! Routes: `GET /messages`, `GET /ws` (WebSocket upgrade), `GET /health`.
//! Middleware: permissive CORS, request tracing.
//!
//! When `web_dir` is configured and exists, a built browser client is served
//! from it. Known routes take priority; unknown paths fall through to the
//! client's `index.html`.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/messages", get(handlers::messages::get_messages))
        .route("/ws", get(handlers::ws::ws_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    if let Some(web_dir) = state.config.web_dir.as_ref().filter(|dir| dir.exists()) {
        let serve_dir = ServeDir::new(web_dir).fallback(ServeFile::new(web_dir.join("index.html")));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir.display(), "Static client serving enabled");
    }

    router
}

/// GET /health - Liveness probe with the current session count.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "connections": state.hub.session_count(),
    }))
}

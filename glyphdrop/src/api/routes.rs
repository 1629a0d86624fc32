use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::frontend;
use super::handlers;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_bytes = state.config.storage.max_upload_bytes;

    Router::new()
        .route(
            "/",
            get(handlers::upload::index).post(handlers::upload::upload),
        )
        .route(
            "/convert/{filename}/{format_type}",
            get(handlers::convert::convert).post(handlers::convert::convert_form),
        )
        .route("/health", get(handlers::health_check))
        .route("/static/{*path}", get(frontend::serve_static))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

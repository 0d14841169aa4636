//! API routes

pub mod ask;
pub mod documents;
pub mod sessions;
pub mod status;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_body_size: usize) -> Router<AppState> {
    Router::new()
        // Documents - larger body limit for file uploads
        .route(
            "/documents",
            post(documents::upload).layer(DefaultBodyLimit::max(max_body_size)),
        )
        .route("/documents", get(documents::list))
        .route("/documents/:id", delete(documents::delete))
        // Question answering
        .route("/ask", post(ask::ask))
        // Chat sessions
        .route("/sessions", post(sessions::save))
        .route("/sessions", get(sessions::list))
        .route("/sessions/:id", get(sessions::get))
        .route("/sessions/:id", delete(sessions::delete))
        // Health of external dependencies
        .route("/status", get(status::status))
}

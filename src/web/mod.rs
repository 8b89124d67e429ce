pub mod handlers;
pub mod pages;

use crate::state::AppState;
use axum::{routing::get, Router};

/// Build the request router.
///
/// The reserved endpoints are explicit routes registered ahead of the
/// catch-all browse handler, so they are decided before any filesystem
/// lookup. Matching is exact and case-sensitive; a nested entry that merely
/// shares a reserved base name (say `/movies/networks`) still goes to the
/// browse handler.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::browse_root))
        .route("/networks", get(handlers::networks))
        .route("/shutdown", get(handlers::shutdown))
        .route("/{*path}", get(handlers::browse))
        .with_state(state)
}

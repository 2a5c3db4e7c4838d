//! Route handlers for the PDF Merger web server.

mod merge;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, routing::post};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub use merge::merge_pdfs;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config().body_limit_bytes();

    Router::new()
        .route("/merge", post(merge_pdfs))
        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

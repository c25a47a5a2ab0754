pub mod rest;
pub mod state;
pub mod summarize;

use axum::{
    routing::{get, patch, post},
    Router,
};
use state::AppState;
use std::sync::Arc;

/// Builds the application router. Kept separate from the binary so the
/// handlers can be exercised end to end in tests.
pub fn app_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/notes",
            get(rest::list_notes_handler).post(rest::create_note_handler),
        )
        .route(
            "/notes/{id}",
            patch(rest::update_note_handler).delete(rest::delete_note_handler),
        )
        .route("/summarize", post(summarize::summarize_handler))
        .route("/healthz", get(summarize::health_handler))
        .with_state(app_state)
}

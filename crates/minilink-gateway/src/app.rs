use axum::routing::{get, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_handler, redirect_handler, shorten_handler, unshorten_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Builds the full route table over the given state.
    ///
    /// The bare `/{code}` route comes last so the fixed paths match first.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/api/shorten", put(shorten_handler))
            .route("/api/unshorten/{code}", get(unshorten_handler))
            .route("/{code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

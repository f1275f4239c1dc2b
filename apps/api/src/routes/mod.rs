pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::tailoring::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/tailor", post(handlers::handle_tailor))
        .route("/resumes", get(handlers::handle_get_resumes))
        // Paths used by the original web front end
        .route("/api/tailor-resume", post(handlers::handle_tailor))
        .route("/api/get-resumes", get(handlers::handle_get_resumes))
        .with_state(state)
}

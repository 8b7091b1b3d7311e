pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::scoring::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Scoring API
        .route("/api/v1/score", post(handlers::handle_score))
        .route(
            "/api/v1/ideal-answers",
            get(handlers::handle_get_ideal_answer),
        )
        .with_state(state)
}

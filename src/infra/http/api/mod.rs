pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::infra::http::middleware::{log_responses, set_request_context};

pub fn build_api_router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/api/subjects",
            get(handlers::list_subjects).post(handlers::create_subject),
        )
        .route(
            "/api/subjects/statistics",
            get(handlers::subject_statistics),
        )
        .route(
            "/api/subjects/{id}",
            get(handlers::get_subject).delete(handlers::delete_subject),
        )
        .route("/health", get(handlers::db_health))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/tags", get(handlers::list_tags))
        .route("/api/logs", get(handlers::list_logs).post(handlers::create))
        .route("/api/logs/:id", delete(handlers::delete))
        .with_state(state)
}

use crate::handlers;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/tip-calculations",
            get(handlers::list_tip_calculations).post(handlers::create_tip_calculation),
        )
        .with_state(state)
}

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/list/:status",
            get(handlers::list_by_status).delete(handlers::remove_anime),
        )
        .route("/api/add_anime", post(handlers::add_anime))
}

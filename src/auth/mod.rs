use axum::{
    routing::{get, post},
    Router,
};

use crate::pages;
use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod password;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/cadastro",
            get(pages::cadastro_page).post(handlers::cadastro),
        )
        .route("/login", get(pages::login_page).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/api/perfil/atualizar", post(handlers::update_profile))
}

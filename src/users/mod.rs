use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod extractors;
pub mod handlers;
pub mod password;
pub mod repo;
mod repo_types;
pub mod token;
pub mod validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/sign-in", post(handlers::sign_in))
        .route("/my-pages", get(handlers::my_pages))
}

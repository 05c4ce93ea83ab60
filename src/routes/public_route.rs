use axum::{routing::get, Router};

use crate::config::AppState;
use crate::handlers::public_handler::*;

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/about", get(about_handler))
        .route("/register", get(register_form_handler).post(register_handler))
        .route("/login", get(login_form_handler).post(login_handler))
        .route("/logout", get(logout_handler))
}

use axum::{middleware, routing::get, Router};

use crate::config::AppState;
use crate::handlers::user_handler::*;
use crate::middleware::auth_middleware::auth_middleware;

pub fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/members", get(members_handler))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

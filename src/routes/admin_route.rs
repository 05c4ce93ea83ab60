use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::config::AppState;
use crate::handlers::admin_handler::*;
use crate::middleware::auth_middleware::{auth_middleware, require_admin};

pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(users_handler))
        .route("/users/{id}/toggle", post(toggle_user_handler))
        .route("/users/{id}/delete", post(delete_user_handler))
        .route("/tags", get(tags_handler).post(create_tag_handler))
        .route("/tags/{id}/delete", post(delete_tag_handler))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

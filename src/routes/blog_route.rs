use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::config::AppState;
use crate::handlers::blog_handler::*;
use crate::middleware::auth_middleware::auth_middleware;

pub fn blog_routes(state: AppState) -> Router<AppState> {
    // Writing requires a login; reading does not.
    let protected = Router::new()
        .route("/new", get(new_post_form_handler).post(create_post_handler))
        .route("/{id}/edit", get(edit_post_form_handler).post(update_post_handler))
        .route("/{id}/delete", post(delete_post_handler))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(list_posts_handler))
        .route("/post/{slug_or_id}", get(show_post_handler))
        .route("/tags", get(tags_handler))
        .route("/tag/{name}", get(tag_posts_handler))
        .merge(protected)
}

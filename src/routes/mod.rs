use axum::{extract::State, http::StatusCode, response::Response, Router};
use tower_cookies::CookieManagerLayer;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::AppState;
use crate::utils::pages::error_page;

pub mod admin_route;
pub mod blog_route;
pub mod public_route;
pub mod user_route;

/// Assembles the application: route groups, static assets, error fallback
/// and the shared middleware stack.
pub fn create_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public_route::public_routes())
        .nest("/users", user_route::user_routes(state.clone()))
        .nest("/blog", blog_route::blog_routes(state.clone()))
        .nest("/admin", admin_route::admin_routes(state))
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        .fallback(not_found_handler)
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn not_found_handler(State(state): State<AppState>) -> Response {
    error_page(&state.templates, StatusCode::NOT_FOUND)
}

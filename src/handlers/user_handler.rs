use axum::{extract::State, response::Response, Extension};
use tower_cookies::Cookies;

use crate::config::AppState;
use crate::models::auth_model::CurrentUser;
use crate::utils::flash::get_flash;
use crate::utils::pages::render_template;

pub async fn members_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    cookies: Cookies,
) -> Response {
    let mut ctx = tera::Context::new();
    ctx.insert("user", &user);
    if let Some(flash) = get_flash(&cookies) {
        ctx.insert("flash", &flash);
    }
    render_template(&state.templates, "members.html.tera", &ctx)
}

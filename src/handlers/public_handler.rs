use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form,
};
use tower_cookies::{Cookie, Cookies};
use validator::Validate;

use crate::config::AppState;
use crate::middleware::auth_middleware::SESSION_COOKIE_NAME;
use crate::models::auth_model::{LoginForm, RegisterForm};
use crate::services::auth_service::AuthService;
use crate::services::post_service::PostService;
use crate::utils::flash::{flash_redirect, get_flash};
use crate::utils::pages::{error_page, render_template};
use crate::utils::validation::first_message;

pub async fn home_handler(State(state): State<AppState>, cookies: Cookies) -> Response {
    match PostService::list_posts(&state.db, 1, 5).await {
        Ok(list) => {
            let mut ctx = tera::Context::new();
            ctx.insert("posts", &list.posts);
            if let Some(flash) = get_flash(&cookies) {
                ctx.insert("flash", &flash);
            }
            render_template(&state.templates, "index.html.tera", &ctx)
        }
        Err((status, code, msg)) => {
            tracing::error!("home page failed ({}): {}", code, msg);
            error_page(&state.templates, status)
        }
    }
}

pub async fn about_handler(State(state): State<AppState>) -> Response {
    render_template(&state.templates, "about.html.tera", &tera::Context::new())
}

pub async fn register_form_handler(State(state): State<AppState>, cookies: Cookies) -> Response {
    let mut ctx = tera::Context::new();
    if let Some(flash) = get_flash(&cookies) {
        ctx.insert("flash", &flash);
    }
    render_template(&state.templates, "register.html.tera", &ctx)
}

pub async fn register_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<RegisterForm>,
) -> Response {
    if let Err(errors) = form.validate() {
        return flash_redirect(&cookies, "/register", "error", &first_message(&errors)).into_response();
    }

    match AuthService::register_user(&state.db, form).await {
        Ok(user) => {
            if let Err(e) = state.mailer.send_welcome(&user.email, &user.username).await {
                tracing::warn!("welcome mail to {} failed: {}", user.email, e);
            }
            flash_redirect(
                &cookies,
                "/",
                "success",
                "Thank you for registering. You can now log in.",
            )
            .into_response()
        }
        Err((_, code, msg)) => {
            tracing::debug!("registration rejected ({})", code);
            flash_redirect(&cookies, "/register", "error", &msg).into_response()
        }
    }
}

pub async fn login_form_handler(State(state): State<AppState>, cookies: Cookies) -> Response {
    let mut ctx = tera::Context::new();
    if let Some(flash) = get_flash(&cookies) {
        ctx.insert("flash", &flash);
    }
    render_template(&state.templates, "login.html.tera", &ctx)
}

pub async fn login_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Response {
    if let Err(errors) = form.validate() {
        return flash_redirect(&cookies, "/login", "error", &first_message(&errors)).into_response();
    }

    match AuthService::login(
        &state.db,
        &form.username,
        &form.password,
        state.config.session_ttl_minutes,
    )
    .await
    {
        Ok((user, session)) => {
            let mut cookie = Cookie::new(SESSION_COOKIE_NAME, session.token);
            cookie.set_path("/");
            cookie.set_http_only(true);
            cookies.add(cookie);

            tracing::info!("user {} logged in", user.username);
            flash_redirect(&cookies, "/users/members", "success", "You are logged in.").into_response()
        }
        Err((_, code, msg)) => {
            tracing::debug!("login rejected ({})", code);
            flash_redirect(&cookies, "/login", "error", &msg).into_response()
        }
    }
}

pub async fn logout_handler(State(state): State<AppState>, cookies: Cookies) -> Response {
    let token = cookies.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string());

    if let Some(token) = token {
        if let Err((_, code, msg)) = AuthService::logout(&state.db, &token).await {
            tracing::error!("logout failed ({}): {}", code, msg);
        }
        let mut removal = Cookie::new(SESSION_COOKIE_NAME, "");
        removal.set_path("/");
        cookies.remove(removal);
    }

    flash_redirect(&cookies, "/", "info", "You are logged out.").into_response()
}

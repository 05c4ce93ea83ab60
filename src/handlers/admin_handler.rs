use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form,
};
use tower_cookies::Cookies;
use validator::Validate;

use crate::config::AppState;
use crate::models::post_model::TagForm;
use crate::services::post_service::PostService;
use crate::services::user_service::UserService;
use crate::utils::flash::{flash_redirect, get_flash};
use crate::utils::pages::{error_page, render_template};
use crate::utils::validation::first_message;

pub async fn users_handler(State(state): State<AppState>, cookies: Cookies) -> Response {
    match UserService::list_users(&state.db).await {
        Ok(users) => {
            let mut ctx = tera::Context::new();
            ctx.insert("users", &users);
            if let Some(flash) = get_flash(&cookies) {
                ctx.insert("flash", &flash);
            }
            render_template(&state.templates, "admin/users.html.tera", &ctx)
        }
        Err((status, code, msg)) => {
            tracing::error!("user listing failed ({}): {}", code, msg);
            error_page(&state.templates, status)
        }
    }
}

pub async fn toggle_user_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    cookies: Cookies,
) -> Response {
    match UserService::toggle_active(&state.db, id).await {
        Ok(user) => {
            // The auth middleware caches user rows; drop the stale entry.
            state.cache.delete(&format!("user:{}", user.id)).await;
            let verb = if user.active { "activated" } else { "deactivated" };
            flash_redirect(
                &cookies,
                "/admin/users",
                "success",
                &format!("User {} {}.", user.username, verb),
            )
            .into_response()
        }
        Err((status, _, _)) => error_page(&state.templates, status),
    }
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    cookies: Cookies,
) -> Response {
    match UserService::delete_user(&state.db, id).await {
        Ok(()) => {
            state.cache.delete(&format!("user:{}", id)).await;
            flash_redirect(&cookies, "/admin/users", "success", "User deleted.").into_response()
        }
        Err((status, _, _)) => error_page(&state.templates, status),
    }
}

pub async fn tags_handler(State(state): State<AppState>, cookies: Cookies) -> Response {
    match PostService::list_tags(&state.db).await {
        Ok(tags) => {
            let mut ctx = tera::Context::new();
            ctx.insert("tags", &tags);
            if let Some(flash) = get_flash(&cookies) {
                ctx.insert("flash", &flash);
            }
            render_template(&state.templates, "admin/tags.html.tera", &ctx)
        }
        Err((status, code, msg)) => {
            tracing::error!("tag listing failed ({}): {}", code, msg);
            error_page(&state.templates, status)
        }
    }
}

pub async fn create_tag_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<TagForm>,
) -> Response {
    if let Err(errors) = form.validate() {
        return flash_redirect(&cookies, "/admin/tags", "error", &first_message(&errors)).into_response();
    }

    match PostService::create_tag(&state.db, &form.name).await {
        Ok(tag) => flash_redirect(
            &cookies,
            "/admin/tags",
            "success",
            &format!("Tag '{}' created.", tag.name),
        )
        .into_response(),
        Err((_, _, msg)) => flash_redirect(&cookies, "/admin/tags", "error", &msg).into_response(),
    }
}

pub async fn delete_tag_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    cookies: Cookies,
) -> Response {
    match PostService::delete_tag(&state.db, id).await {
        Ok(()) => flash_redirect(&cookies, "/admin/tags", "success", "Tag deleted.").into_response(),
        Err((status, _, _)) => error_page(&state.templates, status),
    }
}

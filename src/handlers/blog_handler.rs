use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Extension, Form,
};
use tower_cookies::Cookies;
use validator::Validate;

use crate::config::AppState;
use crate::models::auth_model::CurrentUser;
use crate::models::post_model::{PostForm, PostListParams};
use crate::services::post_service::PostService;
use crate::utils::flash::{flash_redirect, get_flash};
use crate::utils::pages::{error_page, render_template};
use crate::utils::validation::first_message;

pub async fn list_posts_handler(
    State(state): State<AppState>,
    Query(params): Query<PostListParams>,
    cookies: Cookies,
) -> Response {
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(10);

    match PostService::list_posts(&state.db, page, per_page).await {
        Ok(list) => {
            let mut ctx = tera::Context::new();
            ctx.insert("posts", &list.posts);
            ctx.insert("page", &list.page);
            ctx.insert("per_page", &list.per_page);
            ctx.insert("num_pages", &list.num_pages);
            ctx.insert("total", &list.total);
            if let Some(flash) = get_flash(&cookies) {
                ctx.insert("flash", &flash);
            }
            render_template(&state.templates, "blog/index.html.tera", &ctx)
        }
        Err((status, code, msg)) => {
            tracing::error!("post listing failed ({}): {}", code, msg);
            error_page(&state.templates, status)
        }
    }
}

pub async fn show_post_handler(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
) -> Response {
    match PostService::get_post(&state.db, &slug_or_id).await {
        Ok(post) => {
            let mut ctx = tera::Context::new();
            ctx.insert("post", &post);
            render_template(&state.templates, "blog/post.html.tera", &ctx)
        }
        Err((status, _, _)) => error_page(&state.templates, status),
    }
}

pub async fn tags_handler(State(state): State<AppState>) -> Response {
    match PostService::list_tags(&state.db).await {
        Ok(tags) => {
            let mut ctx = tera::Context::new();
            ctx.insert("tags", &tags);
            render_template(&state.templates, "blog/tags.html.tera", &ctx)
        }
        Err((status, code, msg)) => {
            tracing::error!("tag listing failed ({}): {}", code, msg);
            error_page(&state.templates, status)
        }
    }
}

pub async fn tag_posts_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    match PostService::posts_for_tag(&state.db, &name).await {
        Ok((tag, posts)) => {
            let mut ctx = tera::Context::new();
            ctx.insert("tag", &tag);
            ctx.insert("posts", &posts);
            render_template(&state.templates, "blog/tag.html.tera", &ctx)
        }
        Err((status, _, _)) => error_page(&state.templates, status),
    }
}

pub async fn new_post_form_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    cookies: Cookies,
) -> Response {
    let mut ctx = tera::Context::new();
    ctx.insert("user", &user);
    if let Some(flash) = get_flash(&cookies) {
        ctx.insert("flash", &flash);
    }
    render_template(&state.templates, "blog/new.html.tera", &ctx)
}

pub async fn create_post_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    cookies: Cookies,
    Form(form): Form<PostForm>,
) -> Response {
    if let Err(errors) = form.validate() {
        return flash_redirect(&cookies, "/blog/new", "error", &first_message(&errors)).into_response();
    }

    match PostService::create_post(&state.db, user.id, form).await {
        Ok(post) => flash_redirect(
            &cookies,
            &format!("/blog/post/{}", post.slug),
            "success",
            "Post created.",
        )
        .into_response(),
        Err((status, code, msg)) => {
            tracing::error!("post creation failed ({}): {}", code, msg);
            error_page(&state.templates, status)
        }
    }
}

pub async fn edit_post_form_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    cookies: Cookies,
) -> Response {
    match PostService::get_editable(&state.db, id, user.id, user.is_admin).await {
        Ok((post, tags)) => {
            let tag_names = tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", ");
            let mut ctx = tera::Context::new();
            ctx.insert("post", &post);
            ctx.insert("tag_names", &tag_names);
            ctx.insert("user", &user);
            if let Some(flash) = get_flash(&cookies) {
                ctx.insert("flash", &flash);
            }
            render_template(&state.templates, "blog/edit.html.tera", &ctx)
        }
        Err((status, _, _)) => error_page(&state.templates, status),
    }
}

pub async fn update_post_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    cookies: Cookies,
    Form(form): Form<PostForm>,
) -> Response {
    if let Err(errors) = form.validate() {
        return flash_redirect(
            &cookies,
            &format!("/blog/{}/edit", id),
            "error",
            &first_message(&errors),
        )
        .into_response();
    }

    match PostService::update_post(&state.db, id, user.id, user.is_admin, form).await {
        Ok(post) => flash_redirect(
            &cookies,
            &format!("/blog/post/{}", post.slug),
            "success",
            "Post updated.",
        )
        .into_response(),
        Err((status, code, msg)) => {
            tracing::error!("post update failed ({}): {}", code, msg);
            error_page(&state.templates, status)
        }
    }
}

pub async fn delete_post_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    cookies: Cookies,
) -> Response {
    match PostService::delete_post(&state.db, id, user.id, user.is_admin).await {
        Ok(()) => flash_redirect(&cookies, "/blog", "success", "Post deleted.").into_response(),
        Err((status, code, msg)) => {
            tracing::error!("post deletion failed ({}): {}", code, msg);
            error_page(&state.templates, status)
        }
    }
}

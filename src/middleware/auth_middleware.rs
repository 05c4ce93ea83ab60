use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tower_cookies::Cookies;

use crate::config::AppState;
use crate::entities::{session, user};
use crate::models::auth_model::{CurrentUser, UserData};
use crate::utils::pages::error_page;

pub const SESSION_COOKIE_NAME: &str = "session";

// Matches the default session-cookie refresh window.
const USER_CACHE_TTL_SECS: u64 = 15 * 60;

/// Resolves the session cookie into a `CurrentUser` request extension, or
/// answers with the 401 page.
pub async fn auth_middleware(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // 1. Session cookie
    let token = match cookies.get(SESSION_COOKIE_NAME) {
        Some(cookie) => cookie.value().to_string(),
        None => return error_page(&state.templates, StatusCode::UNAUTHORIZED),
    };

    // 2. Session row
    let session = match session::Entity::find()
        .filter(session::Column::Token.eq(token.as_str()))
        .filter(session::Column::RevokedAt.is_null())
        .one(&state.db)
        .await
    {
        Ok(Some(session)) => session,
        Ok(None) => return error_page(&state.templates, StatusCode::UNAUTHORIZED),
        Err(e) => {
            tracing::error!("session lookup failed: {}", e);
            return error_page(&state.templates, StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    if session.expires_at <= Utc::now() {
        return error_page(&state.templates, StatusCode::UNAUTHORIZED);
    }

    // 3. User data (cache -> db)
    let cache_key = format!("user:{}", session.user_id);
    let cached_user: Option<UserData> = state.cache.get(&cache_key).await;

    let user_data = if let Some(user) = cached_user {
        user
    } else {
        match fetch_user_from_db(&state.db, session.user_id).await {
            Ok(Some(user)) => {
                let _ = state.cache.set(&cache_key, &user, USER_CACHE_TTL_SECS).await;
                user
            }
            Ok(None) => return error_page(&state.templates, StatusCode::UNAUTHORIZED),
            Err(e) => {
                tracing::error!("user lookup failed: {}", e);
                return error_page(&state.templates, StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    };

    if !user_data.active {
        return error_page(&state.templates, StatusCode::UNAUTHORIZED);
    }

    // 4. Inject CurrentUser into request
    let current_user = CurrentUser {
        id: user_data.id,
        username: user_data.username,
        email: user_data.email,
        is_admin: user_data.is_admin,
    };
    req.extensions_mut().insert(current_user);

    next.run(req).await
}

/// Gate for the admin route group. Must sit inside `auth_middleware`.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match req.extensions().get::<CurrentUser>() {
        Some(user) if user.is_admin => next.run(req).await,
        Some(user) => {
            tracing::warn!("non-admin {} hit an admin route", user.username);
            error_page(&state.templates, StatusCode::UNAUTHORIZED)
        }
        None => error_page(&state.templates, StatusCode::UNAUTHORIZED),
    }
}

async fn fetch_user_from_db(
    db: &sea_orm::DatabaseConnection,
    user_id: i64,
) -> Result<Option<UserData>, sea_orm::DbErr> {
    Ok(user::Entity::find_by_id(user_id).one(db).await?.map(|u| UserData {
        id: u.id,
        username: u.username,
        email: u.email,
        active: u.active,
        is_admin: u.is_admin,
    }))
}

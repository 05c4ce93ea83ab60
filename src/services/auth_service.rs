use axum::http::StatusCode;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter,
};
use uuid::Uuid;

use crate::entities::{session, user};
use crate::models::auth_model::RegisterForm;
use crate::repositories::user_repository::UserRepository;
use crate::utils::password;

pub struct AuthService;

impl AuthService {
    pub async fn register_user(
        db: &DatabaseConnection,
        form: RegisterForm,
    ) -> Result<user::Model, (StatusCode, &'static str, String)> {
        // 1. Check Duplicate
        let duplicates = UserRepository::find_duplicates(db, &form.username, &form.email)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error".to_string()))?;

        if !duplicates.is_empty() {
            return Err(Self::handle_duplicate_error(&duplicates, &form.username));
        }

        // 2. Hash Password
        let hashed_password = password::hash_password(&form.password)
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "HASH_ERR", "Failed to hash password".to_string()))?;

        // 3. Save User
        UserRepository::create(
            db,
            form.username,
            form.email,
            hashed_password,
            form.first_name.filter(|s| !s.is_empty()),
            form.last_name.filter(|s| !s.is_empty()),
        )
        .await
        .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to save user".to_string()))
    }

    pub async fn login(
        db: &DatabaseConnection,
        login_id: &str,
        plain_password: &str,
        ttl_minutes: i64,
    ) -> Result<(user::Model, session::Model), (StatusCode, &'static str, String)> {
        let user = UserRepository::find_by_login_id(db, login_id)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error".to_string()))?
            .ok_or((StatusCode::UNAUTHORIZED, "BAD_CREDENTIALS", "Unknown username or email".to_string()))?;

        if !password::verify_password(plain_password, &user.password_hash) {
            return Err((StatusCode::UNAUTHORIZED, "BAD_CREDENTIALS", "Invalid password".to_string()));
        }

        if !user.active {
            return Err((StatusCode::UNAUTHORIZED, "ACCOUNT_DISABLED", "This account has been deactivated".to_string()));
        }

        let now = Utc::now();
        let session = session::ActiveModel {
            id: NotSet,
            token: Set(Uuid::new_v4().to_string()),
            user_id: Set(user.id),
            created_at: Set(now),
            expires_at: Set(now + Duration::minutes(ttl_minutes)),
            revoked_at: Set(None),
        }
        .insert(db)
        .await
        .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to create session".to_string()))?;

        Ok((user, session))
    }

    /// Revokes the session behind `token`. A token that no longer resolves is
    /// not an error; logout is idempotent.
    pub async fn logout(
        db: &DatabaseConnection,
        token: &str,
    ) -> Result<(), (StatusCode, &'static str, String)> {
        let session = session::Entity::find()
            .filter(session::Column::Token.eq(token))
            .filter(session::Column::RevokedAt.is_null())
            .one(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error".to_string()))?;

        if let Some(session) = session {
            let mut active: session::ActiveModel = session.into();
            active.revoked_at = Set(Some(Utc::now()));
            active
                .update(db)
                .await
                .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to revoke session".to_string()))?;
        }

        Ok(())
    }

    fn handle_duplicate_error(
        duplicates: &[user::Model],
        username: &str,
    ) -> (StatusCode, &'static str, String) {
        if duplicates.iter().any(|u| u.username == username) {
            (StatusCode::BAD_REQUEST, "USERNAME_TAKEN", "Username already taken".to_string())
        } else {
            (StatusCode::BAD_REQUEST, "EMAIL_TAKEN", "Email already registered".to_string())
        }
    }
}

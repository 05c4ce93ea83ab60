use axum::http::StatusCode;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, QueryOrder};

use crate::entities::{user, user::Entity as User};
use crate::models::user_model::UserView;

type ServiceError = (StatusCode, &'static str, String);

pub struct UserService;

impl UserService {
    pub async fn list_users(db: &sea_orm::DatabaseConnection) -> Result<Vec<UserView>, ServiceError> {
        let users = User::find()
            .order_by_asc(user::Column::Id)
            .all(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Failed to fetch users".to_string()))?;

        Ok(users
            .into_iter()
            .map(|u| UserView {
                id: u.id,
                username: u.username,
                email: u.email,
                first_name: u.first_name,
                last_name: u.last_name,
                active: u.active,
                is_admin: u.is_admin,
                created_at: u.created_at,
            })
            .collect())
    }

    /// Flips the active flag; deactivated users cannot log in and lose any
    /// live session at the next request.
    pub async fn toggle_active(
        db: &sea_orm::DatabaseConnection,
        user_id: i64,
    ) -> Result<user::Model, ServiceError> {
        let user = User::find_by_id(user_id)
            .one(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error".to_string()))?
            .ok_or((StatusCode::NOT_FOUND, "USER_NOT_FOUND", "User not found".to_string()))?;

        let was_active = user.active;
        let mut active_model: user::ActiveModel = user.into();
        active_model.active = Set(!was_active);

        active_model
            .update(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to update user".to_string()))
    }

    /// Deletes a user; their posts and sessions go with them via FK cascade.
    pub async fn delete_user(
        db: &sea_orm::DatabaseConnection,
        user_id: i64,
    ) -> Result<(), ServiceError> {
        let result = User::delete_by_id(user_id)
            .exec(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to delete user".to_string()))?;

        if result.rows_affected == 0 {
            return Err((StatusCode::NOT_FOUND, "USER_NOT_FOUND", "User not found".to_string()));
        }

        Ok(())
    }
}

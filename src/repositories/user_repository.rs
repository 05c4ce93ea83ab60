use chrono::Utc;
use sea_orm::*;

use crate::entities::{user, user::Entity as User};

pub struct UserRepository;

impl UserRepository {
    // Find user by email or username
    pub async fn find_by_login_id<C: ConnectionTrait>(
        db: &C,
        login_id: &str,
    ) -> Result<Option<user::Model>, DbErr> {
        User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(login_id))
                    .add(user::Column::Username.eq(login_id)),
            )
            .one(db)
            .await
    }

    // Check if a username or email is already taken - returns the clashing rows
    pub async fn find_duplicates<C: ConnectionTrait>(
        db: &C,
        username: &str,
        email: &str,
    ) -> Result<Vec<user::Model>, DbErr> {
        User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Username.eq(username)),
            )
            .all(db)
            .await
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        username: String,
        email: String,
        password_hash: String,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<user::Model, DbErr> {
        let new_user = user::ActiveModel {
            id: NotSet,
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            first_name: Set(first_name),
            last_name: Set(last_name),
            active: Set(true),
            is_admin: Set(false),
            created_at: Set(Utc::now()),
        };

        new_user.insert(db).await
    }
}

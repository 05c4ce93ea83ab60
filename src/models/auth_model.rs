use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 3, max = 25, message = "Username must be between 3 and 25 characters"))]
    pub username: String,

    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm: String,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// The authenticated user injected into request extensions by the auth
/// middleware.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

/// Cacheable projection of a user row, used by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub active: bool,
    pub is_admin: bool,
}

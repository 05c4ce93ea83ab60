use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    // Optional; derived from the title when empty.
    pub slug: Option<String>,

    #[validate(length(min = 10, message = "Body is too short"))]
    pub body: String,

    // Comma-separated tag names.
    pub tags: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct TagForm {
    #[validate(length(min = 1, message = "Tag name cannot be empty"))]
    pub name: String,
}

#[derive(Deserialize)]
pub struct PostListParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct TagView {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct AuthorView {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub tags: Vec<TagView>,
    pub author: AuthorView,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PostListView {
    pub posts: Vec<PostView>,
    pub page: u64,
    pub per_page: u64,
    pub num_pages: u64,
    pub total: u64,
}

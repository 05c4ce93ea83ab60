use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::*;
use slug::slugify;

use crate::entities::{post, post::Entity as Post, post_tag, tag, user};
use crate::models::post_model::*;

type ServiceError = (StatusCode, &'static str, String);

pub struct PostService;

impl PostService {
    pub async fn create_post(
        db: &DatabaseConnection,
        author_id: i64,
        payload: PostForm,
    ) -> Result<post::Model, ServiceError> {
        let txn = db
            .begin()
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "TXN_ERR", "Transaction start failed".to_string()))?;

        // Slugs are not unique; a caller-supplied slug wins, otherwise derive
        // one from the title.
        let slug = match payload.slug.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(s) => slugify(s),
            None => slugify(&payload.title),
        };

        let saved = post::ActiveModel {
            id: NotSet,
            title: Set(payload.title),
            slug: Set(slug),
            body: Set(payload.body),
            user_id: Set(author_id),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", format!("Failed to create post: {}", e)))?;

        if let Some(raw_tags) = payload.tags {
            let tags = Self::resolve_tags(&txn, &raw_tags).await?;
            Self::link_tags(&txn, saved.id, &tags).await?;
        }

        txn.commit()
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "TXN_COMMIT_ERR", "Transaction commit failed".to_string()))?;

        Ok(saved)
    }

    /// Fetches one post by slug, falling back to a numeric id. Duplicate
    /// slugs are legal; the oldest post wins.
    pub async fn get_post(
        db: &DatabaseConnection,
        slug_or_id: &str,
    ) -> Result<PostView, ServiceError> {
        let mut found = Post::find()
            .filter(post::Column::Slug.eq(slug_or_id))
            .order_by_asc(post::Column::Id)
            .find_also_related(user::Entity)
            .one(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error".to_string()))?;

        if found.is_none() {
            if let Ok(id) = slug_or_id.parse::<i64>() {
                found = Post::find_by_id(id)
                    .find_also_related(user::Entity)
                    .one(db)
                    .await
                    .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error".to_string()))?;
            }
        }

        let (post, author_opt) =
            found.ok_or((StatusCode::NOT_FOUND, "POST_NOT_FOUND", "Post not found".to_string()))?;

        let author = author_opt
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "DATA_CORRUPT", "Post has no author".to_string()))?;

        let tags = post
            .find_related(tag::Entity)
            .all(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Failed to fetch tags".to_string()))?;

        Ok(Self::map_to_view(post, tags, author))
    }

    pub async fn list_posts(
        db: &DatabaseConnection,
        page: u64,
        per_page: u64,
    ) -> Result<PostListView, ServiceError> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, 100);

        let paginator = Post::find()
            .order_by_desc(post::Column::CreatedAt)
            .find_also_related(user::Entity)
            .paginate(db, per_page);

        let counts = paginator
            .num_items_and_pages()
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Count failed".to_string()))?;

        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Fetch failed".to_string()))?;

        let mut posts = Vec::new();
        for (post, author_opt) in rows {
            let author = author_opt
                .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "DATA_CORRUPT", "Post has no author".to_string()))?;
            let tags = post.find_related(tag::Entity).all(db).await.unwrap_or_default();
            posts.push(Self::map_to_view(post, tags, author));
        }

        Ok(PostListView {
            posts,
            page,
            per_page,
            num_pages: counts.number_of_pages,
            total: counts.number_of_items,
        })
    }

    /// Loads a post for the edit form, enforcing ownership.
    pub async fn get_editable(
        db: &DatabaseConnection,
        post_id: i64,
        user_id: i64,
        is_admin: bool,
    ) -> Result<(post::Model, Vec<tag::Model>), ServiceError> {
        let post = Post::find_by_id(post_id)
            .one(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error".to_string()))?
            .ok_or((StatusCode::NOT_FOUND, "POST_NOT_FOUND", "Post not found".to_string()))?;

        if post.user_id != user_id && !is_admin {
            return Err((StatusCode::UNAUTHORIZED, "ACCESS_DENIED", "You are not the owner of this post".to_string()));
        }

        let tags = post
            .find_related(tag::Entity)
            .all(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Failed to fetch tags".to_string()))?;

        Ok((post, tags))
    }

    pub async fn update_post(
        db: &DatabaseConnection,
        post_id: i64,
        user_id: i64,
        is_admin: bool,
        payload: PostForm,
    ) -> Result<post::Model, ServiceError> {
        let post = Post::find_by_id(post_id)
            .one(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error".to_string()))?
            .ok_or((StatusCode::NOT_FOUND, "POST_NOT_FOUND", "Post not found".to_string()))?;

        if post.user_id != user_id && !is_admin {
            return Err((StatusCode::UNAUTHORIZED, "ACCESS_DENIED", "You are not the owner of this post".to_string()));
        }

        let txn = db
            .begin()
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "TXN_ERR", "Transaction start failed".to_string()))?;

        let slug = match payload.slug.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(s) => slugify(s),
            None => slugify(&payload.title),
        };

        let mut active: post::ActiveModel = post.into();
        active.title = Set(payload.title);
        active.slug = Set(slug);
        active.body = Set(payload.body);

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", format!("Failed to update post: {}", e)))?;

        // Replace the tag set wholesale.
        if let Some(raw_tags) = payload.tags {
            post_tag::Entity::delete_many()
                .filter(post_tag::Column::PostId.eq(updated.id))
                .exec(&txn)
                .await
                .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to clear tags".to_string()))?;

            let tags = Self::resolve_tags(&txn, &raw_tags).await?;
            Self::link_tags(&txn, updated.id, &tags).await?;
        }

        txn.commit()
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "TXN_COMMIT_ERR", "Transaction commit failed".to_string()))?;

        Ok(updated)
    }

    pub async fn delete_post(
        db: &DatabaseConnection,
        post_id: i64,
        user_id: i64,
        is_admin: bool,
    ) -> Result<(), ServiceError> {
        let post = Post::find_by_id(post_id)
            .one(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error".to_string()))?
            .ok_or((StatusCode::NOT_FOUND, "POST_NOT_FOUND", "Post not found".to_string()))?;

        if post.user_id != user_id && !is_admin {
            return Err((StatusCode::UNAUTHORIZED, "ACCESS_DENIED", "You are not the owner of this post".to_string()));
        }

        // tags_posts rows go with it via FK cascade.
        Post::delete_by_id(post.id)
            .exec(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to delete post".to_string()))?;

        Ok(())
    }

    pub async fn list_tags(db: &DatabaseConnection) -> Result<Vec<TagView>, ServiceError> {
        let tags = tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Failed to fetch tags".to_string()))?;

        Ok(tags
            .into_iter()
            .map(|t| TagView { id: t.id, name: t.name })
            .collect())
    }

    /// A tag and every post linked to it through the association table.
    pub async fn posts_for_tag(
        db: &DatabaseConnection,
        name: &str,
    ) -> Result<(tag::Model, Vec<PostView>), ServiceError> {
        let tag = tag::Entity::find()
            .filter(tag::Column::Name.eq(name))
            .one(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error".to_string()))?
            .ok_or((StatusCode::NOT_FOUND, "TAG_NOT_FOUND", "Tag not found".to_string()))?;

        let posts = tag
            .find_related(post::Entity)
            .order_by_desc(post::Column::CreatedAt)
            .all(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Failed to fetch posts".to_string()))?;

        let mut views = Vec::new();
        for post in posts {
            let author = user::Entity::find_by_id(post.user_id)
                .one(db)
                .await
                .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error".to_string()))?
                .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "DATA_CORRUPT", "Post has no author".to_string()))?;
            let tags = post.find_related(tag::Entity).all(db).await.unwrap_or_default();
            views.push(Self::map_to_view(post, tags, author));
        }

        Ok((tag, views))
    }

    pub async fn create_tag(
        db: &DatabaseConnection,
        name: &str,
    ) -> Result<tag::Model, ServiceError> {
        let name = name.trim();

        let existing = tag::Entity::find()
            .filter(tag::Column::Name.eq(name))
            .one(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error".to_string()))?;

        if existing.is_some() {
            return Err((StatusCode::BAD_REQUEST, "TAG_EXISTS", format!("Tag '{}' already exists", name)));
        }

        tag::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", format!("Failed to create tag: {}", e)))
    }

    pub async fn delete_tag(db: &DatabaseConnection, tag_id: i64) -> Result<(), ServiceError> {
        let result = tag::Entity::delete_by_id(tag_id)
            .exec(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to delete tag".to_string()))?;

        if result.rows_affected == 0 {
            return Err((StatusCode::NOT_FOUND, "TAG_NOT_FOUND", "Tag not found".to_string()));
        }

        Ok(())
    }

    /// Turns a comma-separated name list into tag rows, creating the ones
    /// that don't exist yet.
    async fn resolve_tags<C: ConnectionTrait>(
        db: &C,
        raw: &str,
    ) -> Result<Vec<tag::Model>, ServiceError> {
        let mut tags: Vec<tag::Model> = Vec::new();

        for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let existing = tag::Entity::find()
                .filter(tag::Column::Name.eq(name))
                .one(db)
                .await
                .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Tag lookup failed".to_string()))?;

            let tag = match existing {
                Some(t) => t,
                None => tag::ActiveModel {
                    id: NotSet,
                    name: Set(name.to_string()),
                    created_at: Set(Utc::now()),
                }
                .insert(db)
                .await
                .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to create tag".to_string()))?,
            };

            if !tags.iter().any(|t| t.id == tag.id) {
                tags.push(tag);
            }
        }

        Ok(tags)
    }

    async fn link_tags<C: ConnectionTrait>(
        db: &C,
        post_id: i64,
        tags: &[tag::Model],
    ) -> Result<(), ServiceError> {
        for tag in tags {
            let link = post_tag::ActiveModel {
                tag_id: Set(tag.id),
                post_id: Set(post_id),
            };
            link.insert(db)
                .await
                .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to link tag".to_string()))?;
        }
        Ok(())
    }

    fn map_to_view(model: post::Model, tags: Vec<tag::Model>, author: user::Model) -> PostView {
        PostView {
            id: model.id,
            title: model.title,
            slug: model.slug,
            body: model.body,
            tags: tags
                .into_iter()
                .map(|t| TagView { id: t.id, name: t.name })
                .collect(),
            author: AuthorView {
                id: author.id,
                username: author.username,
            },
            created_at: model.created_at,
        }
    }
}

use axum::http::StatusCode;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter,
};

use inkpress::entities::{post, post_tag, session, user};
use inkpress::models::auth_model::RegisterForm;
use inkpress::models::post_model::PostForm;
use inkpress::services::auth_service::AuthService;
use inkpress::services::post_service::PostService;
use inkpress::services::user_service::UserService;

async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

fn register_form(username: &str, email: &str) -> RegisterForm {
    RegisterForm {
        username: username.to_string(),
        email: email.to_string(),
        password: "correct-horse".to_string(),
        confirm: "correct-horse".to_string(),
        first_name: None,
        last_name: None,
    }
}

fn post_form(title: &str, slug: Option<&str>, tags: Option<&str>) -> PostForm {
    PostForm {
        title: title.to_string(),
        slug: slug.map(str::to_string),
        body: "A body that is long enough to pass validation.".to_string(),
        tags: tags.map(str::to_string),
    }
}

async fn make_admin(db: &DatabaseConnection, user_id: i64) {
    let user = user::Entity::find_by_id(user_id).one(db).await.unwrap().unwrap();
    let mut active: user::ActiveModel = user.into();
    active.is_admin = Set(true);
    active.update(db).await.unwrap();
}

#[tokio::test]
async fn register_rejects_duplicates() {
    let db = setup().await;

    let alice = AuthService::register_user(&db, register_form("alice", "alice@example.com"))
        .await
        .unwrap();
    assert_eq!(alice.username, "alice");
    assert!(alice.active);
    assert_ne!(alice.password_hash, "correct-horse");

    let (status, code, _) = AuthService::register_user(&db, register_form("alice", "other@example.com"))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code, "USERNAME_TAKEN");

    let (_, code, _) = AuthService::register_user(&db, register_form("alice2", "alice@example.com"))
        .await
        .unwrap_err();
    assert_eq!(code, "EMAIL_TAKEN");
}

#[tokio::test]
async fn login_and_logout_lifecycle() {
    let db = setup().await;
    let alice = AuthService::register_user(&db, register_form("alice", "alice@example.com"))
        .await
        .unwrap();

    // Wrong password
    let (status, code, _) = AuthService::login(&db, "alice", "wrong", 60).await.unwrap_err();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code, "BAD_CREDENTIALS");

    // Login by username and by email
    let (user, sess) = AuthService::login(&db, "alice", "correct-horse", 60).await.unwrap();
    assert_eq!(user.id, alice.id);
    assert!(!sess.token.is_empty());
    assert!(sess.revoked_at.is_none());
    assert!(sess.expires_at > sess.created_at);

    let (_, sess2) = AuthService::login(&db, "alice@example.com", "correct-horse", 60)
        .await
        .unwrap();
    assert_ne!(sess.token, sess2.token);

    // Logout revokes the session
    AuthService::logout(&db, &sess.token).await.unwrap();
    let revoked = session::Entity::find()
        .filter(session::Column::Token.eq(sess.token.as_str()))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(revoked.revoked_at.is_some());

    // Logout is idempotent
    AuthService::logout(&db, &sess.token).await.unwrap();

    // Deactivated accounts cannot log in
    UserService::toggle_active(&db, alice.id).await.unwrap();
    let (_, code, _) = AuthService::login(&db, "alice", "correct-horse", 60).await.unwrap_err();
    assert_eq!(code, "ACCOUNT_DISABLED");
}

#[tokio::test]
async fn create_post_persists_fields_and_tags() {
    let db = setup().await;
    let alice = AuthService::register_user(&db, register_form("alice", "alice@example.com"))
        .await
        .unwrap();

    let saved = PostService::create_post(&db, alice.id, post_form("Hello World", None, Some("rust, web")))
        .await
        .unwrap();

    assert_eq!(saved.title, "Hello World");
    assert_eq!(saved.slug, "hello-world");
    assert_eq!(saved.user_id, alice.id);
    assert!(saved.created_at <= chrono::Utc::now());

    let view = PostService::get_post(&db, "hello-world").await.unwrap();
    assert_eq!(view.id, saved.id);
    assert_eq!(view.author.username, "alice");
    let mut tag_names: Vec<_> = view.tags.iter().map(|t| t.name.clone()).collect();
    tag_names.sort();
    assert_eq!(tag_names, vec!["rust", "web"]);

    // Lookup by id works too
    let by_id = PostService::get_post(&db, &saved.id.to_string()).await.unwrap();
    assert_eq!(by_id.slug, "hello-world");

    let (status, _, _) = PostService::get_post(&db, "no-such-post").await.unwrap_err();
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_replaces_tag_set() {
    let db = setup().await;
    let alice = AuthService::register_user(&db, register_form("alice", "alice@example.com"))
        .await
        .unwrap();

    let saved = PostService::create_post(&db, alice.id, post_form("Tagged", None, Some("one, two")))
        .await
        .unwrap();

    PostService::update_post(&db, saved.id, alice.id, false, post_form("Tagged", None, Some("three")))
        .await
        .unwrap();

    let view = PostService::get_post(&db, "tagged").await.unwrap();
    let names: Vec<_> = view.tags.iter().map(|t| t.name.clone()).collect();
    assert_eq!(names, vec!["three"]);

    // Exactly one association row remains
    let links = post_tag::Entity::find()
        .filter(post_tag::Column::PostId.eq(saved.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(links, 1);
}

#[tokio::test]
async fn delete_post_removes_association_rows() {
    let db = setup().await;
    let alice = AuthService::register_user(&db, register_form("alice", "alice@example.com"))
        .await
        .unwrap();

    let saved = PostService::create_post(&db, alice.id, post_form("Doomed", None, Some("tmp")))
        .await
        .unwrap();

    PostService::delete_post(&db, saved.id, alice.id, false).await.unwrap();

    assert!(post::Entity::find_by_id(saved.id).one(&db).await.unwrap().is_none());
    let links = post_tag::Entity::find()
        .filter(post_tag::Column::PostId.eq(saved.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(links, 0);
}

#[tokio::test]
async fn duplicate_slugs_allowed_and_first_match_wins() {
    let db = setup().await;
    let alice = AuthService::register_user(&db, register_form("alice", "alice@example.com"))
        .await
        .unwrap();

    let first = PostService::create_post(&db, alice.id, post_form("First", Some("shared"), None))
        .await
        .unwrap();
    let second = PostService::create_post(&db, alice.id, post_form("Second", Some("shared"), None))
        .await
        .unwrap();
    assert_eq!(first.slug, second.slug);

    let view = PostService::get_post(&db, "shared").await.unwrap();
    assert_eq!(view.id, first.id);
}

#[tokio::test]
async fn ownership_is_enforced_for_edit_and_delete() {
    let db = setup().await;
    let alice = AuthService::register_user(&db, register_form("alice", "alice@example.com"))
        .await
        .unwrap();
    let bob = AuthService::register_user(&db, register_form("bob", "bob@example.com"))
        .await
        .unwrap();

    let saved = PostService::create_post(&db, alice.id, post_form("Mine", None, None))
        .await
        .unwrap();

    let (status, code, _) = PostService::update_post(&db, saved.id, bob.id, false, post_form("Stolen", None, None))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code, "ACCESS_DENIED");

    let (status, _, _) = PostService::delete_post(&db, saved.id, bob.id, false).await.unwrap_err();
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Admins bypass ownership
    make_admin(&db, bob.id).await;
    PostService::update_post(&db, saved.id, bob.id, true, post_form("Edited by admin", None, None))
        .await
        .unwrap();
    PostService::delete_post(&db, saved.id, bob.id, true).await.unwrap();
}

#[tokio::test]
async fn tag_page_lists_exactly_linked_posts() {
    let db = setup().await;
    let alice = AuthService::register_user(&db, register_form("alice", "alice@example.com"))
        .await
        .unwrap();

    PostService::create_post(&db, alice.id, post_form("Rusty", None, Some("rust")))
        .await
        .unwrap();
    PostService::create_post(&db, alice.id, post_form("Webby", None, Some("web")))
        .await
        .unwrap();
    PostService::create_post(&db, alice.id, post_form("Both", None, Some("rust, web")))
        .await
        .unwrap();

    let (tag, posts) = PostService::posts_for_tag(&db, "rust").await.unwrap();
    assert_eq!(tag.name, "rust");
    let mut titles: Vec<_> = posts.iter().map(|p| p.title.clone()).collect();
    titles.sort();
    assert_eq!(titles, vec!["Both", "Rusty"]);

    let (status, _, _) = PostService::posts_for_tag(&db, "missing").await.unwrap_err();
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pagination_counts_pages() {
    let db = setup().await;
    let alice = AuthService::register_user(&db, register_form("alice", "alice@example.com"))
        .await
        .unwrap();

    for i in 0..7 {
        PostService::create_post(&db, alice.id, post_form(&format!("Post {}", i), None, None))
            .await
            .unwrap();
    }

    let list = PostService::list_posts(&db, 1, 3).await.unwrap();
    assert_eq!(list.total, 7);
    assert_eq!(list.num_pages, 3);
    assert_eq!(list.posts.len(), 3);

    let last = PostService::list_posts(&db, 3, 3).await.unwrap();
    assert_eq!(last.posts.len(), 1);
}

#[tokio::test]
async fn admin_delete_user_cascades_posts_and_sessions() {
    let db = setup().await;
    let alice = AuthService::register_user(&db, register_form("alice", "alice@example.com"))
        .await
        .unwrap();
    AuthService::login(&db, "alice", "correct-horse", 60).await.unwrap();
    PostService::create_post(&db, alice.id, post_form("Orphan-to-be", None, None))
        .await
        .unwrap();

    UserService::delete_user(&db, alice.id).await.unwrap();

    assert_eq!(user::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(post::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(session::Entity::find().count(&db).await.unwrap(), 0);

    let (status, _, _) = UserService::delete_user(&db, alice.id).await.unwrap_err();
    assert_eq!(status, StatusCode::NOT_FOUND);
}

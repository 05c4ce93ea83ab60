use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tera::Tera;
use tower::util::ServiceExt;

use inkpress::config::{AppState, Config, Environment};
use inkpress::routes::create_routes;
use inkpress::services::cache_service::CacheService;
use inkpress::services::email_service::EmailService;

fn test_config() -> Config {
    Config {
        env: Environment::Development,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: "sqlite::memory:".to_string(),
        redis_url: "redis://127.0.0.1/".to_string(),
        smtp_from: "test@example.com".to_string(),
        mail_api_key: String::new(),
        session_ttl_minutes: 60,
    }
}

async fn test_app() -> Router {
    let cfg = test_config();
    let db = Database::connect(cfg.database_url.as_str()).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let templates = Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*")).unwrap();

    let state = AppState {
        db,
        templates,
        cache: CacheService::new(&cfg),
        mailer: EmailService::new(&cfg),
        config: cfg,
    };

    create_routes(state.clone()).with_state(state)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&bytes).to_string()
}

#[tokio::test]
async fn home_page_renders() {
    let app = test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Welcome to Inkpress"));
}

#[tokio::test]
async fn unknown_route_renders_404_page() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/definitely-not-a-route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(body.contains("404"));
    assert!(body.contains("Page not found"));
}

#[tokio::test]
async fn members_page_requires_login() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/members")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_string(response).await;
    assert!(body.contains("401"));
}

#[tokio::test]
async fn admin_pages_require_login() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_and_visit_members_page() {
    let app = test_app().await;

    // Register
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/register")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "username=alice&email=alice%40example.com&password=correct-horse&confirm=correct-horse&first_name=&last_name=",
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Login
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("username=alice&password=correct-horse"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let session_cookie = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session="))
        .expect("login must set a session cookie")
        .split(';')
        .next()
        .unwrap()
        .to_string();

    // Members page with the session cookie
    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/members")
                .header(header::COOKIE, session_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Welcome, alice"));
}

#[tokio::test]
async fn login_with_bad_password_redirects_back() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/register")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "username=bob&email=bob%40example.com&password=correct-horse&confirm=correct-horse&first_name=&last_name=",
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("username=bob&password=wrong"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get(header::LOCATION).unwrap().to_str().unwrap();
    assert_eq!(location, "/login");
}

use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use std::net::SocketAddr;
use tera::Tera;

use inkpress::config::{AppState, Config};
use inkpress::routes;
use inkpress::services::cache_service::CacheService;
use inkpress::services::email_service::EmailService;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt::init();

    let cfg = Config::init();
    println!("🚀 Starting Inkpress...");

    // 1. Database Connection
    let db = Database::connect(&cfg.database_url)
        .await
        .expect("Failed to connect to database");
    println!("✅ Database connected");

    // 2. Schema Migrations
    Migrator::up(&db, None)
        .await
        .expect("Failed to apply migrations");
    println!("✅ Migrations applied");

    // 3. Cache Connection (optional: requests fall back to the database)
    let cache = CacheService::new(&cfg);
    if let Err(e) = cache.check_connection().await {
        tracing::warn!("cache unavailable, user lookups will always hit the database: {}", e);
    } else {
        println!("✅ Cache connected");
    }

    // 4. Templates
    let templates = Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*"))
        .expect("Tera initialization failed");

    // 5. Services + App State
    let mailer = EmailService::new(&cfg);
    let state = AppState {
        db,
        templates,
        cache,
        mailer,
        config: cfg.clone(),
    };

    // 6. Router
    let app = routes::create_routes(state.clone()).with_state(state);

    // 7. Serve
    let addr_str = format!("{}:{}", cfg.server_host, cfg.server_port);
    let addr: SocketAddr = addr_str.parse().expect("Invalid bind address");

    println!("🎯 Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app).await.expect("Server error");
}

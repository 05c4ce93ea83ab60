use sea_orm::DatabaseConnection;
use std::env;
use tera::Tera;

use crate::services::cache_service::CacheService;
use crate::services::email_service::EmailService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub env: Environment,
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub redis_url: String,
    pub smtp_from: String,
    pub mail_api_key: String,
    pub session_ttl_minutes: i64,
}

#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub templates: Tera,
    pub cache: CacheService,
    pub mailer: EmailService,
    pub config: Config,
}

impl Config {
    pub fn init() -> Config {
        let app_env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        };

        let server_host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .expect("PORT must be a number");

        // Production deployments take the connection string from the environment;
        // development falls back to a local SQLite file.
        let database_url = match app_env {
            Environment::Production => {
                env::var("DATABASE_URL").expect("DATABASE_URL must be set in production")
            }
            Environment::Development => env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://inkpress.db?mode=rwc".to_string()),
        };

        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());

        let smtp_from = env::var("SMTP_FROM").unwrap_or_else(|_| "admin@inkpress.dev".to_string());
        let mail_api_key = env::var("MAIL_API_KEY").unwrap_or_default();

        let session_ttl_minutes = env::var("SESSION_TTL_MINUTES")
            .unwrap_or_else(|_| "10080".to_string())
            .parse::<i64>()
            .expect("SESSION_TTL_MINUTES must be a number");

        Config {
            env: app_env,
            server_host,
            server_port,
            database_url,
            redis_url,
            smtp_from,
            mail_api_key,
            session_ttl_minutes,
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == Environment::Production
    }
}

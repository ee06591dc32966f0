//! Application configuration loaded from environment variables.

use std::env;

use chrono::TimeDelta;

use blog_infra::JwtConfig;
use blog_infra::database::DatabaseConfig;

const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    /// Where unauthenticated callers are sent; `?next=` is appended.
    pub login_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let defaults = DatabaseConfig::new(url);
            DatabaseConfig {
                max_connections: parsed("DB_MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
                min_connections: parsed("DB_MIN_CONNECTIONS").unwrap_or(defaults.min_connections),
                ..defaults
            }
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            database,
            jwt: jwt_from_env(),
            login_url: env::var("LOGIN_URL").unwrap_or_else(|_| "/login/".to_string()),
        }
    }
}

fn jwt_from_env() -> JwtConfig {
    let secret = env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string());
    if secret == DEFAULT_JWT_SECRET {
        let production = env::var("RUST_ENV").is_ok_and(|v| v == "production" || v == "prod");
        if production {
            tracing::error!("SECURITY: default JWT secret in production. Set JWT_SECRET.");
        } else {
            tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
        }
    }

    let defaults = JwtConfig::new(secret);
    JwtConfig {
        session_ttl: parsed("JWT_EXPIRATION_HOURS")
            .map(TimeDelta::hours)
            .unwrap_or(defaults.session_ttl),
        issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| defaults.issuer.clone()),
        ..defaults
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

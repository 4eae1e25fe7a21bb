//! Shared helpers for integration tests.

#![allow(dead_code)]

use backend::config::Config;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Config pointing at an in-memory database. The rate provider URL is
/// supplied per test so it can target a local stand-in server.
pub fn test_config(rate_api_url: &str) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        max_connections: 1,
        acquire_timeout_seconds: 3,
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expires_in_seconds: 1800,
        server_port: 0,
        rate_api_url: rate_api_url.to_string(),
        rate_timeout_seconds: 2,
    }
}

/// In-memory pool with migrations applied. A single connection keeps every
/// query on the same in-memory database.
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    pool
}

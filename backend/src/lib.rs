//! RateDesk backend - user registration, login, and a token-protected
//! market data lookup.
//!
//! The router is assembled here so both the binary and the integration
//! tests drive the exact same application.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod utils;

use axum::{Extension, Router, response::Json, routing::get};
use serde::Serialize;
use services::market_data::MarketDataService;
use sqlx::SqlitePool;
use utils::jwt::JwtUtils;

/// Health check payload
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub hostname: String,
    pub timestamp: String,
}

/// Builds the application router with all routes and shared state.
///
/// The pool, the JWT keys, and the market data client are constructed once
/// by the caller and injected as extensions; handlers never reach for the
/// environment themselves.
pub fn app(pool: SqlitePool, jwt_utils: JwtUtils, market: MarketDataService) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(auth::routes::auth_router())
        .merge(api::market::routes::market_router())
        .layer(Extension(pool))
        .layer(Extension(jwt_utils))
        .layer(Extension(market))
}

/// Liveness probe; requires no authentication.
async fn health_check() -> Json<HealthCheck> {
    let hostname = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    Json(HealthCheck {
        status: "ok",
        hostname,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

//! Defines the HTTP route for the market data lookup.

use crate::api::market::handlers::get_market_data;
use crate::auth::middleware::require_auth;
use axum::{Router, middleware, routing::get};

/// Creates the market data router. The lookup is token-protected.
pub fn market_router() -> Router {
    Router::new().route(
        "/data",
        get(get_market_data).layer(middleware::from_fn(require_auth)),
    )
}

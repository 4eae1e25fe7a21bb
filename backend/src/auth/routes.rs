//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle user registration, login, and the current-user
//! lookup. They are designed to be merged into the main Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::require_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me).layer(middleware::from_fn(require_auth)))
}

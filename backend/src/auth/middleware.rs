//! Middleware for protecting authenticated routes.
//!
//! This module contains the bearer-token gate that every protected route
//! passes through before its handler runs.

use crate::auth::service::AuthService;
use crate::database::models::User;
use crate::utils::jwt::JwtUtils;
use axum::{
    extract::Request,
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;

/// The identity resolved for the current request, inserted into request
/// extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Bearer-token authentication gate.
///
/// A missing header, a non-Bearer scheme, an invalid or expired token, and
/// a token whose subject no longer resolves to a stored user all answer
/// 403 with no further detail.
pub async fn require_auth(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    let jwt_utils = request
        .extensions()
        .get::<JwtUtils>()
        .cloned()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    let pool = request
        .extensions()
        .get::<SqlitePool>()
        .cloned()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(StatusCode::FORBIDDEN)?;

    // Check if it's a Bearer token
    if !auth_header.starts_with("Bearer ") {
        return Err(StatusCode::FORBIDDEN);
    }

    let token = &auth_header[7..]; // Remove "Bearer " prefix

    let claims = jwt_utils
        .validate_token(token)
        .map_err(|_| StatusCode::FORBIDDEN)?;

    // The subject must still resolve to a stored identity
    let auth_service = AuthService::new(&pool, &jwt_utils);
    let user = auth_service
        .resolve_user(&claims)
        .await
        .map_err(|_| StatusCode::FORBIDDEN)?;

    // Make claims and identity available to handlers
    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

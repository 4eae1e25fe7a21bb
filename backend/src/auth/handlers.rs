//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for user registration and
//! login, parse request data, and interact with the `auth::service` for
//! core business logic.

use crate::api::common::service_error_to_http;
use crate::auth::middleware::CurrentUser;
use crate::auth::models::{LoginRequest, RegisterRequest, TokenResponse, UserInfo};
use crate::auth::service::AuthService;
use crate::utils::jwt::JwtUtils;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt_utils): Extension<JwtUtils>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, ResponseJson<TokenResponse>), (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, &jwt_utils);

    match auth_service.register(payload).await {
        Ok(response) => Ok((StatusCode::CREATED, ResponseJson(response))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt_utils): Extension<JwtUtils>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<TokenResponse>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, &jwt_utils);

    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Get current user information from the resolved identity
#[axum::debug_handler]
pub async fn me(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ResponseJson<UserInfo> {
    ResponseJson(UserInfo::from(&user))
}

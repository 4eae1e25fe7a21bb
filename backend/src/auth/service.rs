//! Core business logic for the authentication system.

use crate::auth::models::{LoginRequest, RegisterRequest, TokenResponse};
use crate::database::models::{CreateUser, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::utils::jwt::{Claims, JwtUtils};
use crate::utils::password;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

/// Authentication service for registration, login, and identity resolution
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    jwt_utils: &'a JwtUtils,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    pub fn new(pool: &'a SqlitePool, jwt_utils: &'a JwtUtils) -> Self {
        AuthService { pool, jwt_utils }
    }

    /// Register a new user and issue a token for the fresh identity.
    ///
    /// The email is normalized to lowercase before it is stored; duplicate
    /// detection is left to the storage-level unique constraint.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<TokenResponse> {
        Self::validate_request(&request)?;

        let email = request.email.trim().to_lowercase();
        let password_hash = password::hash_password(&request.password)?;

        let repo = UserRepository::new(self.pool);
        let user = repo
            .create_user(CreateUser {
                id: Uuid::now_v7().to_string(),
                name: request.name.trim().to_string(),
                email,
                password_hash,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!("Registered user {}", user.id);

        let token = self.jwt_utils.generate_token(&user.id)?;
        Ok(TokenResponse { jwt: token })
    }

    /// Authenticate a user by email and password and issue a token.
    ///
    /// An unknown email and a wrong password produce the identical
    /// `InvalidCredentials` error, so a caller cannot probe which emails
    /// are registered.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<TokenResponse> {
        Self::validate_request(&request)?;

        let email = request.email.trim().to_lowercase();

        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_email(&email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !password::verify_password(&request.password, &user.password_hash) {
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.jwt_utils.generate_token(&user.id)?;
        Ok(TokenResponse { jwt: token })
    }

    /// Resolve the stored identity behind a validated token's claims.
    ///
    /// A token whose subject no longer exists resolves to `Unauthorized`,
    /// indistinguishable from any other token failure.
    pub async fn resolve_user(&self, claims: &Claims) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        repo.get_user_by_id(claims.user_id())
            .await?
            .ok_or(ServiceError::Unauthorized)
    }

    fn validate_request(request: &impl Validate) -> ServiceResult<()> {
        if let Err(validation_errors) = request.validate() {
            let error_messages: Vec<String> = validation_errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| {
                        format!(
                            "{}: {}",
                            field,
                            error.message.as_ref().unwrap_or(&"Invalid value".into())
                        )
                    })
                })
                .collect();
            return Err(ServiceError::validation(error_messages.join(", ")));
        }
        Ok(())
    }
}

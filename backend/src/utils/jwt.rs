//! JWT token utilities for authentication and authorization.
//!
//! Provides secure token creation, validation, and claims management for
//! user authentication.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};

/// JWT Claims structure carrying the authenticated identity
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Token issued at timestamp
    pub iat: usize,
    /// Token expiration timestamp
    pub exp: usize,
}

/// JWT token utility for creating and validating tokens.
///
/// Built once at startup from [`Config`] and shared across requests; the
/// signing secret is never re-read from the environment afterwards.
#[derive(Clone)]
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in_seconds: u64,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from application configuration.
    pub fn new(config: &Config) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        // The algorithm is pinned here; whatever a presented token claims
        // in its own header is not trusted. Zero leeway so `exp` is
        // enforced exactly.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            expires_in_seconds: config.jwt_expires_in_seconds,
        }
    }

    /// Generate a new JWT token for the given user id
    pub fn generate_token(&self, user_id: &str) -> ServiceResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expires_in_seconds as i64);

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a JWT token.
    ///
    /// Signature mismatch, expiry, and malformed or incomplete claims all
    /// collapse into [`ServiceError::Unauthorized`]; the caller cannot tell
    /// which check failed.
    pub fn validate_token(&self, token: &str) -> ServiceResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|_| ServiceError::Unauthorized)
    }

}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(ttl_seconds: u64) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "unit-test-secret".to_string(),
            jwt_expires_in_seconds: ttl_seconds,
            server_port: 0,
            rate_api_url: "http://localhost".to_string(),
            rate_timeout_seconds: 1,
        }
    }

    #[test]
    fn issued_token_validates_and_carries_subject() {
        let jwt_utils = JwtUtils::new(&test_config(1800));

        let token = jwt_utils.generate_token("user-123").unwrap();
        let claims = jwt_utils.validate_token(&token).unwrap();

        assert_eq!(claims.user_id(), "user-123");
        assert_eq!(claims.exp - claims.iat, 1800);
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt_utils = JwtUtils::new(&test_config(1800));

        // Craft claims that expired two minutes ago, signed with the same
        // secret the validator uses.
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "user-123".to_string(),
            iat: now - 300,
            exp: now - 120,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert!(matches!(
            jwt_utils.validate_token(&token),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn token_close_to_expiry_still_validates() {
        let jwt_utils = JwtUtils::new(&test_config(1800));

        // Issued 29 minutes ago with a 30 minute lifetime
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "user-123".to_string(),
            iat: now - 1740,
            exp: now - 1740 + 1800,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert!(jwt_utils.validate_token(&token).is_ok());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let jwt_utils = JwtUtils::new(&test_config(1800));

        let mut other = test_config(1800);
        other.jwt_secret = "a-different-secret".to_string();
        let token = JwtUtils::new(&other).generate_token("user-123").unwrap();

        assert!(matches!(
            jwt_utils.validate_token(&token),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let jwt_utils = JwtUtils::new(&test_config(1800));

        let mut token = jwt_utils.generate_token("user-123").unwrap();
        let last = if token.ends_with('A') { 'B' } else { 'A' };
        token.pop();
        token.push(last);

        assert!(matches!(
            jwt_utils.validate_token(&token),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn claims_without_subject_are_rejected() {
        let jwt_utils = JwtUtils::new(&test_config(1800));

        let now = Utc::now().timestamp();
        let payload = serde_json::json!({ "iat": now, "exp": now + 600 });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert!(matches!(
            jwt_utils.validate_token(&token),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let jwt_utils = JwtUtils::new(&test_config(1800));

        assert!(matches!(
            jwt_utils.validate_token("not.a.token"),
            Err(ServiceError::Unauthorized)
        ));
    }
}

//! Password hashing and verification.
//!
//! bcrypt generates a fresh random salt on every call, so two users with
//! the same password never share a stored hash.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::{ServiceError, ServiceResult};

/// Hash a plaintext password for storage.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
}

/// Verify a plaintext password against a stored hash.
///
/// `false` covers wrong passwords as well as malformed or foreign hash
/// records; a mismatch is an expected outcome, not a fault.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    verify(password, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trip_verifies() {
        let hashed = hash_password("correct horse battery staple").unwrap();

        assert!(verify_password("correct horse battery staple", &hashed));
        assert!(!verify_password("correct horse battery stable", &hashed));
    }

    #[test]
    fn same_password_hashes_differently() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();

        // Random salt per call
        assert_ne!(first, second);
        assert!(verify_password("hunter2", &first));
        assert!(verify_password("hunter2", &second));
    }

    #[test]
    fn hash_is_not_the_plaintext() {
        let hashed = hash_password("hunter2").unwrap();

        assert_ne!(hashed, "hunter2");
        assert!(hashed.starts_with("$2"));
    }

    #[test]
    fn malformed_hash_verifies_false() {
        assert!(!verify_password("hunter2", "not-a-bcrypt-record"));
        assert!(!verify_password("hunter2", ""));
    }
}

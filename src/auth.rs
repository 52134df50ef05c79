//! Password hashing and bearer tokens.
//!
//! Hashing is an explicit, pure step invoked by registration and admin
//! password resets before persistence — the storage layer never hashes
//! anything behind the caller's back.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Role;

/// Bearer token claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub role: Role,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

/// Hash a plaintext password for storage.
pub fn hash_password(password: &str) -> Result<String> {
    if password.len() < 8 {
        return Err(Error::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }
    hash(password, DEFAULT_COST).map_err(|e| Error::Corrupt(format!("bcrypt: {e}")))
}

/// Check a plaintext password against a stored hash.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    verify(password, password_hash).unwrap_or(false)
}

/// Issue a signed bearer token for an account.
pub fn issue_token(account_id: &str, role: Role, secret: &str, ttl_days: i64) -> Result<String> {
    let claims = Claims {
        sub: account_id.to_string(),
        role,
        exp: (Utc::now() + Duration::days(ttl_days)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Corrupt(format!("token encoding: {e}")))
}

/// Verify a bearer token and return its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| Error::Unauthorized("invalid or expired token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hashed = hash_password("correct horse battery").unwrap();
        assert_ne!(hashed, "correct horse battery");
        assert!(verify_password("correct horse battery", &hashed));
        assert!(!verify_password("wrong guess", &hashed));
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(matches!(hash_password("short"), Err(Error::Validation(_))));
    }

    #[test]
    fn token_round_trip() {
        let token = issue_token("acct-1", Role::Admin, "test-secret", 1).unwrap();
        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, "acct-1");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn tampered_tokens_fail_verification() {
        let token = issue_token("acct-1", Role::User, "test-secret", 1).unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
        assert!(verify_token("not-a-token", "test-secret").is_err());
    }
}

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::access::{Principal, Role};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(principal: Principal, expiry_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: principal.id,
            role: principal.role,
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.sub,
            role: self.role,
        }
    }
}

/// Sign a token for the given principal.
pub fn generate_jwt(
    principal: Principal,
    secret: &str,
    expiry_hours: u64,
) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }
    let claims = Claims::new(principal, expiry_hours);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Validate a token and extract its claims.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| AuthError::InvalidToken(format!("Invalid token: {}", e)))?;
    Ok(data.claims)
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| AuthError::Hashing(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Random password-reset token. The caller mails the cleartext token; only
/// its hash is stored.
pub fn generate_reset_token() -> String {
    let bytes: [u8; 20] = rand::random();
    hex::encode(bytes)
}

/// Hash a reset token for at-rest comparison.
pub fn hash_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwt_round_trip_preserves_principal() {
        let principal = Principal {
            id: Uuid::new_v4(),
            role: Role::Publisher,
        };
        let token = generate_jwt(principal, "test-secret", 1).unwrap();
        let claims = verify_jwt(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, principal.id);
        assert_eq!(claims.role, Role::Publisher);
    }

    #[test]
    fn jwt_rejects_wrong_secret() {
        let principal = Principal {
            id: Uuid::new_v4(),
            role: Role::User,
        };
        let token = generate_jwt(principal, "secret-a", 1).unwrap();
        assert!(verify_jwt(&token, "secret-b").is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        let principal = Principal {
            id: Uuid::new_v4(),
            role: Role::User,
        };
        assert!(matches!(
            generate_jwt(principal, "", 1),
            Err(AuthError::MissingSecret)
        ));
    }

    #[test]
    fn password_verifies_against_its_hash() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn reset_token_hash_is_deterministic_and_distinct() {
        let token = generate_reset_token();
        assert_eq!(token.len(), 40);
        assert_eq!(hash_reset_token(&token), hash_reset_token(&token));
        assert_ne!(hash_reset_token(&token), token);
    }
}

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::user::UserRole;

#[derive(Debug, Error)]
pub enum AuthTokenError {
    #[error("token encoding failed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: Uuid,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
}

impl Claims {
    /// Seconds until expiry, never below one.
    pub fn remaining_seconds(&self) -> u64 {
        (self.exp - Utc::now().timestamp()).max(1) as u64
    }
}

/// HS256 signing material plus token lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, expire_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::minutes(expire_minutes),
        }
    }

    pub fn issue(&self, user_id: Uuid, role: UserRole) -> Result<String, AuthTokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            role,
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
            jti: Uuid::new_v4(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthTokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(AuthTokenError::Encode)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthTokenError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(AuthTokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_verify() {
        let keys = JwtKeys::new("test-secret", 30);
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id, UserRole::Manager).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, UserRole::Manager);
        assert_eq!(claims.exp - claims.iat, 30 * 60);
        assert!(claims.remaining_seconds() > 29 * 60);
    }

    #[test]
    fn test_each_token_gets_fresh_jti() {
        let keys = JwtKeys::new("test-secret", 30);
        let id = Uuid::new_v4();
        let a = keys.verify(&keys.issue(id, UserRole::Member).unwrap()).unwrap();
        let b = keys.verify(&keys.issue(id, UserRole::Member).unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtKeys::new("one", 30)
            .issue(Uuid::new_v4(), UserRole::Member)
            .unwrap();
        assert!(JwtKeys::new("two", 30).verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = JwtKeys::new("test-secret", 30);
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: UserRole::Member,
            iat: past.timestamp(),
            exp: (past + Duration::minutes(30)).timestamp(),
            jti: Uuid::new_v4(),
        };
        let token = keys.sign(&claims).unwrap();
        assert!(keys.verify(&token).is_err());
        assert_eq!(claims.remaining_seconds(), 1);
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(JwtKeys::new("s", 30).verify("not.a.token").is_err());
    }
}

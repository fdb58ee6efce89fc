use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::AppError;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

const PASSWORD_SPECIALS: &str = r#"!@#$%^&*(),.?":{}|<>"#;
const MIN_PASSWORD_LEN: usize = 8;

/// Hashes a password with bcrypt on the blocking pool.
pub async fn hash_password(password: String) -> Result<String> {
    let hash =
        tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST)).await??;
    Ok(hash)
}

/// Checks a password against a stored bcrypt hash. A malformed hash verifies as false.
pub async fn verify_password(password: String, hash: String) -> Result<bool> {
    let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await?;
    Ok(ok)
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AppError::Validation("Invalid email address".to_string()))
    }
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    let fail = |msg: &str| Err(AppError::Validation(msg.to_string()));

    if password.chars().count() < MIN_PASSWORD_LEN {
        return fail("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return fail("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return fail("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return fail("Password must contain at least one digit");
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        return fail("Password must contain at least one special character");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert!(validate_email("ana.silva+team@ideia.tech").is_ok());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("ana@localhost").is_err());
    }

    #[test]
    fn test_password_rules_each_reported() {
        let message = |p: &str| match validate_password(p) {
            Err(AppError::Validation(m)) => m,
            other => panic!("expected validation error, got {other:?}"),
        };
        assert!(message("Ab1!").contains("8 characters"));
        assert!(message("abcdefg1!").contains("uppercase"));
        assert!(message("ABCDEFG1!").contains("lowercase"));
        assert!(message("Abcdefgh!").contains("digit"));
        assert!(message("Abcdefgh1").contains("special"));
        assert!(validate_password("Abcdefg1!").is_ok());
    }

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hash = hash_password("Secret#123".to_string()).await.unwrap();
        assert_ne!(hash, "Secret#123");
        assert!(verify_password("Secret#123".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("secret#123".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_does_not_verify() {
        assert!(!verify_password("x".to_string(), "not-a-hash".to_string())
            .await
            .unwrap());
    }
}

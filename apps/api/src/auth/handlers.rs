use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::extractor::CurrentUser;
use crate::auth::password::{hash_password, validate_email, validate_password, verify_password};
use crate::auth::revocation;
use crate::errors::AppError;
use crate::models::user::{PublicUser, User};
use crate::state::AppState;
use crate::users::queries::{self, NewUser};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password: String,
    pub department: Option<String>,
    pub position: Option<String>,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_email(&self.email)?;
        check_len("username", &self.username, 3, 50)?;
        if self.username.contains('@') {
            return Err(AppError::Validation(
                "username must not contain '@'".to_string(),
            ));
        }
        check_len("full_name", &self.full_name, 3, 255)?;
        validate_password(&self.password)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: PublicUser,
}

/// Inclusive character-length check shared by request validators.
pub fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(AppError::Validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

fn token_response(state: &AppState, user: &User) -> Result<TokenResponse, AppError> {
    let access_token = state
        .jwt
        .issue(user.id, user.role)
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(TokenResponse {
        access_token,
        token_type: "bearer",
        user: PublicUser::from(user),
    })
}

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    req.validate()?;

    if queries::email_or_username_taken(&state.db, &req.email, &req.username).await? {
        return Err(AppError::Validation(
            "Email or username already registered".to_string(),
        ));
    }

    let password_hash = hash_password(req.password.clone()).await?;
    let user = queries::insert(
        &state.db,
        &NewUser {
            email: req.email.trim(),
            username: req.username.trim(),
            full_name: req.full_name.trim(),
            password_hash: &password_hash,
            department: req.department.as_deref(),
            position: req.position.as_deref(),
        },
    )
    .await
    .map_err(AppError::on_duplicate("Email or username already registered"))?;

    info!(user_id = %user.id, "Registered new user");
    Ok((StatusCode::CREATED, Json(token_response(&state, &user)?)))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    // Same rejection for unknown user and wrong password.
    let user = queries::find_by_login(&state.db, req.username.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;
    if !verify_password(req.password, user.password_hash.clone()).await? {
        return Err(AppError::Unauthorized);
    }

    if !user.is_active {
        return Err(AppError::Forbidden("Inactive user".to_string()));
    }

    queries::touch_last_login(&state.db, user.id).await?;
    info!(user_id = %user.id, "User logged in");

    Ok(Json(token_response(&state, &user)?))
}

/// GET /api/v1/auth/me
pub async fn handle_me(current: CurrentUser) -> Json<PublicUser> {
    Json(PublicUser::from(&current.user))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Value>, AppError> {
    revocation::revoke(&state.redis, &current.claims).await?;
    info!(user_id = %current.user.id, "User logged out");
    Ok(Json(json!({ "message": "Logged out successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            username: username.to_string(),
            full_name: "Ana Silva".to_string(),
            password: password.to_string(),
            department: None,
            position: None,
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(request("ana@ideia.tech", "ana", "Strong#1pw").validate().is_ok());
        assert!(request("ana", "ana", "Strong#1pw").validate().is_err());
        assert!(request("ana@ideia.tech", "an", "Strong#1pw").validate().is_err());
        assert!(request("ana@ideia.tech", "ana", "weak").validate().is_err());
    }

    #[test]
    fn test_username_cannot_look_like_an_email() {
        let err = request("mallory@ideia.tech", "ana@ideia.tech", "Strong#1pw")
            .validate()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains('@')));
        assert!(request("mallory@ideia.tech", "ana.silva", "Strong#1pw").validate().is_ok());
    }

    #[test]
    fn test_check_len_counts_chars_not_bytes() {
        assert!(check_len("full_name", "Zoë", 3, 10).is_ok());
        assert!(check_len("full_name", "  ab  ", 3, 10).is_err());
        assert!(check_len("title", &"x".repeat(11), 3, 10).is_err());
    }
}

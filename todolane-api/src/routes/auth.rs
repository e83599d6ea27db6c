/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/signup` - Register a new account
/// - `POST /api/auth/login` - Authenticate and receive a session token
///
/// Login deliberately answers identically for an unknown email and a wrong
/// password so the response never reveals which half was wrong.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use todolane_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, PublicUser, User},
};
use validator::Validate;

/// Message returned for every failed login attempt
const LOGIN_FAILED: &str = "Invalid email or password";

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (plaintext over TLS; hashed before storage)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token, valid for 24 hours
    pub token: String,

    /// The authenticated user's public fields
    pub user: PublicUser,
}

/// Register a new account
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/signup
/// Content-Type: application/json
///
/// {
///   "name": "John Doe",
///   "email": "user@example.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the public user fields; the password hash is never
/// returned.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already registered (case-insensitive)
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<PublicUser>)> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    // The CITEXT unique constraint is the source of truth for duplicates;
    // a violation maps to 409 in the sqlx error conversion.
    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(PublicUser::from(&user))))
}

/// Authenticate and issue a session token
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ...",
///   "user": { "id": "...", "name": "...", "email": "..." }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Unknown email or wrong password (same message)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(LOGIN_FAILED.to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized(LOGIN_FAILED.to_string()));
    }

    let claims = jwt::Claims::new(user.id, user.email.clone());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_validation() {
        let valid = SignupRequest {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty_name = SignupRequest {
            name: String::new(),
            email: "jane@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(empty_name.validate().is_err());

        let bad_email = SignupRequest {
            name: "Jane".to_string(),
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = SignupRequest {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "five5".to_string(),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "jane@example.com".to_string(),
            password: "x".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty_password = LoginRequest {
            email: "jane@example.com".to_string(),
            password: String::new(),
        };
        assert!(empty_password.validate().is_err());

        let bad_email = LoginRequest {
            email: "nope".to_string(),
            password: "secret1".to_string(),
        };
        assert!(bad_email.validate().is_err());
    }
}

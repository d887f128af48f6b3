//! Session-based authentication module.
//!
//! Passwords are hashed with argon2; sessions are opaque bearer tokens
//! persisted in SQLite. The middleware resolves the token to an explicit
//! `CurrentUser` so handlers never reach for ambient state.

use std::sync::Arc;

use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::db::Repository;
use crate::errors::{codes, AppError, ErrorDetails, ErrorResponse};

/// The authenticated user attached to every request behind the auth layer.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
    /// The session token the request authenticated with (needed for logout)
    pub token: String,
}

impl CurrentUser {
    /// Whether this user may mutate the given record owner's data.
    pub fn can_modify(&self, owner_id: &str) -> bool {
        self.is_admin || self.id == owner_id
    }
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut rand::thread_rng());

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored hash.
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Session authentication layer.
///
/// Expects `Authorization: Bearer <token>`; resolves the token to a user and
/// injects a [`CurrentUser`] extension, or rejects with 401.
pub async fn session_auth_layer(
    repo: Arc<Repository>,
    admin_email: Option<String>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string());

    let Some(token) = token else {
        return unauthorized_response("Missing session token");
    };

    match repo.find_session_user(&token).await {
        Ok(Some(user)) => {
            let is_admin = admin_email.as_deref() == Some(user.email.as_str());
            request.extensions_mut().insert(CurrentUser {
                id: user.id,
                email: user.email,
                is_admin,
                token,
            });
            next.run(request).await
        }
        Ok(None) => unauthorized_response("Invalid or expired session token"),
        Err(e) => e.into_response(),
    }
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
            details: None,
        },
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

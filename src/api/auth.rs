//! Registration, login, and session endpoints.

use axum::{extract::State, Extension, Json};

use super::{success, ApiResult};
use crate::auth::{self, CurrentUser};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, User, UserInfo};
use crate::AppState;

/// POST /api/auth/register - Create a new account.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<UserInfo> {
    let email = request.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if request.password.is_empty() {
        return Err(AppError::Validation("A password is required".to_string()));
    }

    let password_hash = auth::hash_password(&request.password)?;
    let user = state.repo.create_user(&email, &password_hash).await?;

    tracing::info!("Registered account {}", user.email);
    success(user_info(&user, &state.config))
}

/// POST /api/auth/login - Authenticate and open a session.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let email = request.email.trim().to_lowercase();

    // One message for both failure modes; don't reveal which accounts exist
    let rejected = || AppError::Unauthorized("Unknown email or wrong password".to_string());

    let user = state
        .repo
        .find_user_by_email(&email)
        .await?
        .ok_or_else(rejected)?;

    if !auth::verify_password(&user.password_hash, &request.password) {
        return Err(rejected());
    }

    let session = state.repo.create_session(&user.id).await?;

    success(LoginResponse {
        token: session.token,
        user: user_info(&user, &state.config),
    })
}

/// POST /api/auth/logout - Close the current session.
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<()> {
    state.repo.delete_session(&user.token).await?;
    success(())
}

/// GET /api/auth/me - Current account info.
pub async fn me(Extension(user): Extension<CurrentUser>) -> ApiResult<UserInfo> {
    success(UserInfo {
        id: user.id,
        email: user.email,
        is_admin: user.is_admin,
    })
}

fn user_info(user: &User, config: &Config) -> UserInfo {
    UserInfo {
        id: user.id.clone(),
        email: user.email.clone(),
        is_admin: config.admin_email.as_deref() == Some(user.email.as_str()),
    }
}

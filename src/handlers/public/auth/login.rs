// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::password::verify_password_blocking;
use crate::error::ApiError;
use crate::handlers::validate::required_text;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub token: String,
}

/// POST /api/auth/login - Exchange credentials for a bearer token
///
/// Expected Input:
/// ```json
/// { "email": "alice@example.com", "password": "..." }
/// ```
///
/// Expected Output (Success):
/// ```json
/// { "status": "success", "token": "eyJhbGciOiJIUzI1NiI..." }
/// ```
///
/// Unknown email and wrong password both answer 401 with the same message.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(payload) = payload?;

    let email = required_text("email", payload.email)?;
    let password = payload
        .password
        .ok_or_else(|| ApiError::validation("`password` is required"))?;

    let Some(user) = state.store.users().find_by_email(&email).await? else {
        tracing::info!("Login failed: unknown email");
        return Err(ApiError::invalid_credentials());
    };

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        tracing::info!("Login failed: wrong password for user {}", user.id);
        return Err(ApiError::invalid_credentials());
    }

    let token = state.tokens.issue(user.id)?;
    tracing::info!("User {} logged in", user.id);

    Ok(ApiResponse::success(LoginResponse {
        status: "success",
        token,
    }))
}

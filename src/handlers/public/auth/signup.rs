// handlers/public/auth/signup.rs - POST /api/auth/signup handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::password::hash_password_blocking;
use crate::database::models::{NewUser, UserProfile};
use crate::error::ApiError;
use crate::handlers::validate::required_text;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/signup - Create an account
///
/// Expected Input:
/// ```json
/// { "username": "alice", "email": "alice@example.com", "password": "..." }
/// ```
///
/// Responds 201 with the new user's public profile. The password hash is
/// never part of the response. A taken email or a missing field is a 400.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let Json(payload) = payload?;

    let username = required_text("username", payload.username)?;
    let email = required_text("email", payload.email)?;
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation("`password` is required"))?;

    let min_length = state.config.security.password_min_length;
    if password.chars().count() < min_length {
        return Err(ApiError::validation(format!(
            "`password` must be at least {} characters",
            min_length
        )));
    }

    let password_hash = hash_password_blocking(password).await?;
    let user = state
        .store
        .users()
        .create_user(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;

    tracing::info!("Registered user {} ({})", user.id, user.email);
    Ok(ApiResponse::created(UserProfile::from(user)))
}

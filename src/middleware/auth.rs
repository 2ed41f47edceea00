use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::User;
use crate::error::ApiError;

/// Identity of the caller, resolved from the bearer token and the user store.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Gate for every holdings route.
///
/// Rejects with 401 when the header is missing or malformed, when the token
/// fails signature or expiry checks, or when it names a user that no longer
/// exists. The caller always gets the same message; the reason only goes to
/// the debug log. On success the [`AuthUser`] is stored in the request
/// extensions for the handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).map_err(|reason| {
        tracing::debug!("Rejecting request: {}", reason);
        ApiError::unauthenticated()
    })?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::debug!("Rejecting request: {}", e);
        ApiError::unauthenticated()
    })?;

    let user = state
        .store
        .users()
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::debug!("Rejecting request: token user {} does not exist", claims.sub);
            ApiError::unauthenticated()
        })?;

    request.extensions_mut().insert(AuthUser::from(user));

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must use Bearer token format")?
        .trim();

    if token.is_empty() {
        return Err("Empty bearer token");
    }
    Ok(token)
}

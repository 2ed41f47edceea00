// HTTP API Error Types
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::auth::password::PasswordError;
use crate::auth::TokenError;
use crate::database::StoreError;
use crate::portfolio::PortfolioError;

/// Every failure a handler can report, one variant per response class.
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("{0}")]
    Validation(String),

    // 401 Unauthorized
    #[error("{0}")]
    Unauthenticated(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 404 Not Found, dashboard with no holdings
    #[error("No stocks found for this user.")]
    EmptyPortfolio,

    // 422 Unprocessable Entity, holdings exist but their total is zero or overflows
    #[error("Portfolio total value is zero or out of range; distribution is undefined.")]
    DegenerateAggregation,

    // 500 Internal Server Error
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) | ApiError::EmptyPortfolio => StatusCode::NOT_FOUND,
            ApiError::DegenerateAggregation => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Response body: `{"error": message}`
    pub fn to_json(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

// Static constructor methods
impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn unauthenticated() -> Self {
        ApiError::Unauthenticated("Please authenticate.".to_string())
    }

    pub fn invalid_credentials() -> Self {
        ApiError::Unauthenticated("Invalid email or password".to_string())
    }

    pub fn stock_not_found() -> Self {
        ApiError::NotFound("Stock not found".to_string())
    }

    pub fn internal() -> Self {
        ApiError::Internal("An error occurred while processing your request".to_string())
    }
}

// Convert other error types to ApiError
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => ApiError::validation("Email is already registered"),
            StoreError::InvalidDatabaseUrl(url) => {
                tracing::error!("Store misconfigured: unsupported database URL {}", url);
                ApiError::internal()
            }
            StoreError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal()
            }
        }
    }
}

impl From<PortfolioError> for ApiError {
    fn from(err: PortfolioError) -> Self {
        match err {
            PortfolioError::EmptyPortfolio => ApiError::EmptyPortfolio,
            PortfolioError::DegenerateAggregation => ApiError::DegenerateAggregation,
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        tracing::error!("Password hashing error: {}", err);
        ApiError::internal()
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        tracing::error!("Token issue error: {}", err);
        ApiError::internal()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

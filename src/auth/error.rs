// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::{debug, error, warn};

use crate::auth::models::UserType;

/// Authentication and authorization error types
#[derive(Debug)]
pub enum AuthError {
    // Authentication errors
    ValidationError(String),
    /// Unknown email or wrong password; deliberately indistinguishable
    InvalidCredentials,
    InvalidToken,
    MissingToken,
    EmailAlreadyExists,
    UnknownUserType(String),
    DatabaseError(String),
    PasswordHashError,
    TokenGenerationError(String),

    // Authorization errors
    /// Privileged signup without a product key, or with one that does not verify
    InvalidProductKey,
    /// Caller's role is not in the operation's allow-list
    /// `actual` is None when the caller's account could not be found
    InsufficientPermissions {
        allowed: &'static [UserType],
        actual: Option<UserType>,
    },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::MissingToken => write!(f, "Missing authentication token"),
            AuthError::EmailAlreadyExists => write!(f, "Email is already taken"),
            AuthError::UnknownUserType(value) => write!(f, "Invalid user type: {}", value),
            AuthError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AuthError::PasswordHashError => write!(f, "Password hashing error"),
            AuthError::TokenGenerationError(msg) => write!(f, "Token generation error: {}", msg),
            AuthError::InvalidProductKey => write!(f, "Invalid product key"),
            AuthError::InsufficientPermissions { allowed, actual } => {
                let actual = actual.map(|r| r.as_str()).unwrap_or("none");
                write!(f, "Insufficient permissions: allowed roles {:?}, user has role '{}'", allowed, actual)
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::DatabaseError(msg) => error!("Database error in auth: {}", msg),
            AuthError::PasswordHashError => error!("Password hashing error"),
            AuthError::TokenGenerationError(msg) => error!("Token generation error: {}", msg),
            AuthError::InvalidProductKey => warn!("Rejected signup with invalid product key"),
            AuthError::InsufficientPermissions { .. } => warn!("Authorization failed: {}", self),
            AuthError::MissingToken | AuthError::InvalidToken => warn!("Rejected request: {}", self),
            _ => debug!("Auth request rejected: {}", self),
        }

        let body = Json(json!({
            "error": self.error_message(),
        }));

        (self.status_code(), body).into_response()
    }
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::EmailAlreadyExists => StatusCode::CONFLICT,
            AuthError::UnknownUserType(_) => StatusCode::BAD_REQUEST,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::PasswordHashError => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InvalidProductKey => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions { .. } => StatusCode::UNAUTHORIZED,
        }
    }

    /// Get a descriptive error message for this error
    /// This message is safe to send to clients (no sensitive data)
    pub fn error_message(&self) -> String {
        match self {
            AuthError::ValidationError(msg) => msg.clone(),
            AuthError::InvalidCredentials => "Invalid credentials".to_string(),
            AuthError::InvalidToken => "Invalid token".to_string(),
            AuthError::MissingToken => "Missing authentication token".to_string(),
            AuthError::EmailAlreadyExists => "Email is already taken".to_string(),
            AuthError::UnknownUserType(value) => format!("Invalid user type: {}", value),
            AuthError::DatabaseError(_) => "Internal server error".to_string(),
            AuthError::PasswordHashError => "Internal server error".to_string(),
            AuthError::TokenGenerationError(_) => "Internal server error".to_string(),
            AuthError::InvalidProductKey => "Unauthorized".to_string(),
            AuthError::InsufficientPermissions { .. } => "Unauthorized".to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AuthError::ValidationError(errors.to_string())
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &error {
            if db_err.is_unique_violation() {
                return AuthError::EmailAlreadyExists;
            }
        }
        AuthError::DatabaseError(error.to_string())
    }
}

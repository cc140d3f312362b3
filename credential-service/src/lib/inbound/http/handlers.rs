use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::identity::errors::IdentityError;
use crate::identity::errors::PasswordPolicyError;
use crate::identity::errors::UsernameError;

pub mod login;
pub mod register;
pub mod session;

/// Message returned for every authentication failure.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

const INTERNAL_SERVER_ERROR: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Failure returned to callers as `{ "error": message }`.
///
/// Messages are safe to expose; internal detail is logged before conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    MethodNotAllowed(String),
    Conflict(String),
    Unauthorized(String),
    RequestTimeout(String),
}

impl ApiError {
    pub fn internal() -> Self {
        Self::InternalServerError(INTERNAL_SERVER_ERROR.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::MethodNotAllowed(msg) => (StatusCode::METHOD_NOT_ALLOWED, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::RequestTimeout(msg) => (StatusCode::REQUEST_TIMEOUT, msg),
        };

        (status, Json(ApiErrorBody { error: message })).into_response()
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidUsername(_) | IdentityError::InvalidPassword(_) => {
                ApiError::BadRequest(err.to_string())
            }
            IdentityError::UsernameAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            IdentityError::InvalidCredentials => {
                ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
            }
            IdentityError::HashingFailed(_)
            | IdentityError::SigningFailed(_)
            | IdentityError::StoreUnavailable(_) => {
                tracing::error!(error = %err, "Request failed");
                ApiError::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Failure to turn a `{ username, password }` body into a command.
#[derive(Debug, Clone, Error)]
pub enum ParseCredentialsError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),
}

impl From<ParseCredentialsError> for ApiError {
    fn from(err: ParseCredentialsError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_errors_hide_detail() {
        let err = ApiError::from(IdentityError::StoreUnavailable(
            "password authentication failed for user \"postgres\"".to_string(),
        ));
        assert_eq!(err, ApiError::InternalServerError("Internal server error".to_string()));
    }

    #[test]
    fn test_invalid_credentials_is_generic() {
        let err = ApiError::from(IdentityError::InvalidCredentials);
        assert_eq!(err, ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    #[test]
    fn test_duplicate_is_conflict() {
        let err = ApiError::from(IdentityError::UsernameAlreadyExists("alice".to_string()));
        assert!(matches!(err, ApiError::Conflict(msg) if msg.contains("already exists")));
    }

    #[test]
    fn test_validation_is_bad_request() {
        let err = ApiError::from(IdentityError::InvalidUsername(UsernameError::Empty));
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}

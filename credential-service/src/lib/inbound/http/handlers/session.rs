use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedIdentity;

/// Echo the claims of the presented bearer token.
pub async fn session(
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> ApiSuccess<SessionResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        SessionResponseData {
            username: identity.username,
            exp: identity.expires_at,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub username: String,
    pub exp: i64,
}

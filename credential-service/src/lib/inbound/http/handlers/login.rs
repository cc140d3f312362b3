use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::ParseCredentialsError;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::Password;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;

pub async fn login<S: CredentialServicePort>(
    State(state): State<AppState<S>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = payload?;

    // Unknown user and wrong password both surface as InvalidCredentials
    let token = state
        .credential_service
        .login(body.try_into_command()?)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData { token: token.token },
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

impl LoginRequest {
    fn try_into_command(self) -> Result<LoginCommand, ParseCredentialsError> {
        let username = Username::new(self.username)?;
        let password = Password::new(self.password)?;
        Ok(LoginCommand::new(username, password))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
}

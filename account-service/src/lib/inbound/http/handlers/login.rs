use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::required;
use super::ApiError;
use super::ApiSuccess;
use super::UserEnvelope;
use super::UserResponseData;
use crate::domain::profile::ports::ProfileServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Password;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

pub async fn login<US, PS>(
    State(state): State<AppState<US, PS>>,
    Json(body): Json<UserEnvelope<LoginRequest>>,
) -> Result<ApiSuccess<UserResponseData>, ApiError>
where
    US: UserServicePort,
    PS: ProfileServicePort,
{
    let command = body.into_inner()?.try_into_command()?;

    state
        .user_service
        .login(command)
        .await
        .map_err(ApiError::from)
        .map(|logged_in| {
            ApiSuccess::new(
                StatusCode::OK,
                UserResponseData::new(&logged_in.user, logged_in.token),
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

impl LoginRequest {
    /// Missing fields are a validation error; values that could never match
    /// an account fail like any other bad credential.
    fn try_into_command(self) -> Result<LoginCommand, UserError> {
        let email = required("email", self.email)?;
        let password = required("password", self.password)?;

        match (EmailAddress::new(email), Password::new(password)) {
            (Ok(email), Ok(password)) => Ok(LoginCommand { email, password }),
            _ => Err(UserError::InvalidCredentials),
        }
    }
}

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
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

pub async fn register<US, PS>(
    State(state): State<AppState<US, PS>>,
    Json(body): Json<UserEnvelope<RegisterUserRequest>>,
) -> Result<ApiSuccess<UserResponseData>, ApiError>
where
    US: UserServicePort,
    PS: ProfileServicePort,
{
    let command = body.into_inner()?.try_into_command()?;

    state
        .user_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|registered| {
            ApiSuccess::new(
                StatusCode::CREATED,
                UserResponseData::new(&registered.user, registered.token),
            )
        })
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterUserRequest {
    email: Option<String>,
    username: Option<String>,
    password: Option<String>,
    bio: Option<String>,
    image: Option<String>,
}

impl RegisterUserRequest {
    fn try_into_command(self) -> Result<RegisterUserCommand, UserError> {
        let email = EmailAddress::new(required("email", self.email)?)?;
        let username = Username::new(required("username", self.username)?)?;
        let password = Password::new(required("password", self.password)?)?;

        Ok(RegisterUserCommand::new(username, email, password)
            .with_bio(self.bio)
            .with_image(self.image))
    }
}

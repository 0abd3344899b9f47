use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::profile::ports::ProfileServicePort;
use crate::inbound::http::extractors::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserServicePort;

pub async fn current_user<US, PS>(
    State(state): State<AppState<US, PS>>,
    caller: AuthenticatedUser,
) -> Result<ApiSuccess<UserResponseData>, ApiError>
where
    US: UserServicePort,
    PS: ProfileServicePort,
{
    state
        .user_service
        .current_user(&caller.token)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, UserResponseData::new(user, caller.token)))
}

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::profile_username;
use super::ApiError;
use super::ApiSuccess;
use super::ProfileResponseData;
use crate::domain::profile::ports::ProfileServicePort;
use crate::inbound::http::extractors::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserServicePort;

pub async fn unfollow_user<US, PS>(
    State(state): State<AppState<US, PS>>,
    caller: AuthenticatedUser,
    Path(username): Path<String>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError>
where
    US: UserServicePort,
    PS: ProfileServicePort,
{
    let username = profile_username(username)?;

    state
        .profile_service
        .unfollow(&caller.user_id, &username)
        .await
        .map_err(ApiError::from)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}

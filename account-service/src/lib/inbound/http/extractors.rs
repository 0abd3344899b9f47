use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::handlers::ApiError;
use super::router::AppState;
use crate::domain::profile::ports::ProfileServicePort;
use crate::domain::user::models::UserId;
use crate::user::ports::UserServicePort;

const TOKEN_SCHEMES: [&str; 2] = ["Token ", "Bearer "];

/// Identity of a caller that presented a valid session token.
///
/// Rejects the request with 401 when the header is missing or the token does
/// not verify.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub token: String,
}

/// Identity of a caller on routes that also serve anonymous viewers.
///
/// Missing header or any verification failure yields `None`.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticatedUser(pub Option<AuthenticatedUser>);

impl MaybeAuthenticatedUser {
    pub fn user_id(&self) -> Option<&UserId> {
        self.0.as_ref().map(|user| &user.user_id)
    }
}

#[async_trait]
impl<US, PS> FromRequestParts<AppState<US, PS>> for AuthenticatedUser
where
    US: UserServicePort,
    PS: ProfileServicePort,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<US, PS>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let user_id = state.user_service.authenticate_token(token).map_err(|e| {
            tracing::warn!(error = %e, "Token rejected");
            ApiError::from(e)
        })?;

        Ok(Self {
            user_id,
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl<US, PS> FromRequestParts<AppState<US, PS>> for MaybeAuthenticatedUser
where
    US: UserServicePort,
    PS: ProfileServicePort,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<US, PS>,
    ) -> Result<Self, Self::Rejection> {
        let Ok(Some(token)) = extract_token(parts) else {
            return Ok(Self(None));
        };

        match state.user_service.authenticate_token(token) {
            Ok(user_id) => Ok(Self(Some(AuthenticatedUser {
                user_id,
                token: token.to_string(),
            }))),
            Err(e) => {
                tracing::debug!(error = %e, "Treating caller as anonymous");
                Ok(Self(None))
            }
        }
    }
}

/// Token from `Authorization: Token <jwt>` or `Authorization: Bearer <jwt>`.
fn extract_token(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    TOKEN_SCHEMES
        .iter()
        .find_map(|scheme| value.strip_prefix(scheme))
        .map(|token| Some(token.trim()))
        .ok_or_else(|| {
            ApiError::Unauthorized(
                "Invalid Authorization header format. Expected: Token <token>".to_string(),
            )
        })
}

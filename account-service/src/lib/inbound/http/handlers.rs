use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::profile::errors::ProfileError;
use crate::domain::profile::models::Profile;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;

pub mod current_user;
pub mod follow_user;
pub mod get_profile;
pub mod login;
pub mod register;
pub mod unfollow_user;
pub mod update_user;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

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
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError,
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
            ),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::UsernameAlreadyExists(_) | UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict(err.to_string())
            }
            UserError::InvalidCredentials | UserError::TokenInvalid | UserError::TokenExpired => {
                ApiError::Unauthorized(err.to_string())
            }
            UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPassword(_)
            | UserError::MissingField(_) => ApiError::UnprocessableEntity(err.to_string()),
            UserError::HashingFailed(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                tracing::error!(error = %err, "Request failed");
                ApiError::InternalServerError
            }
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ProfileError::AlreadyFollowing => ApiError::Conflict(err.to_string()),
            ProfileError::SelfFollow => ApiError::BadRequest(err.to_string()),
            ProfileError::User(user_err) => ApiError::from(user_err),
            ProfileError::DatabaseError(_) => {
                tracing::error!(error = %err, "Request failed");
                ApiError::InternalServerError
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Request wrapper: every body arrives as `{"user": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct UserEnvelope<T> {
    pub user: Option<T>,
}

impl<T> UserEnvelope<T> {
    pub fn into_inner(self) -> Result<T, UserError> {
        self.user.ok_or(UserError::MissingField("user"))
    }
}

/// The caller's own account, with the token they authenticate with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponseData {
    pub email: String,
    pub token: String,
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl UserResponseData {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            email: user.email.to_string(),
            token,
            username: user.username.to_string(),
            bio: user.bio.clone(),
            image: user.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileResponseData {
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub following: bool,
}

impl From<Profile> for ProfileResponseData {
    fn from(profile: Profile) -> Self {
        Self {
            username: profile.username.to_string(),
            bio: profile.bio,
            image: profile.image,
            following: profile.following,
        }
    }
}

/// Unwrap a required string field of a request body.
pub(crate) fn required(field: &'static str, value: Option<String>) -> Result<String, UserError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(UserError::MissingField(field))
}

/// Path segment naming a profile. A name that fails validation cannot exist.
pub(crate) fn profile_username(raw: String) -> Result<Username, ApiError> {
    Username::new(raw.clone()).map_err(|_| ApiError::NotFound(format!("Profile not found: {}", raw)))
}

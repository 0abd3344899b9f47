use thiserror::Error;

use crate::user::errors::UserError;

/// Error for profile views and follow-graph operations
#[derive(Debug, Clone, Error)]
pub enum ProfileError {
    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Already following this user")]
    AlreadyFollowing,

    #[error("Users cannot follow themselves")]
    SelfFollow,

    /// Failure while looking up users
    #[error(transparent)]
    User(#[from] UserError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

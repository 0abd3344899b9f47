use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserSession;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;

/// Port for registration, login and account operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user and mint a session token.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `HashingFailed` - Password could not be hashed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterUserCommand)
        -> Result<UserSession, UserError>;

    /// Verify email and password and mint a session token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, indistinguishably
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<UserSession, UserError>;

    /// Resolve the user a session token belongs to.
    ///
    /// # Errors
    /// * `TokenInvalid` - Bad signature, malformed token or user no longer exists
    /// * `TokenExpired` - Token is past its expiry
    /// * `DatabaseError` - Database operation failed
    async fn current_user(&self, token: &str) -> Result<User, UserError>;

    /// Verify a session token and return the embedded user ID.
    ///
    /// # Errors
    /// * `TokenInvalid` - Bad signature, malformed token or subject
    /// * `TokenExpired` - Token is past its expiry
    fn authenticate_token(&self, token: &str) -> Result<UserId, UserError>;

    /// Update the record of the authenticated caller.
    ///
    /// # Arguments
    /// * `auth_user_id` - ID of the authenticated caller; the only record touched
    /// * `command` - Fields to overwrite
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update_user(
        &self,
        auth_user_id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError>;
}

/// Persistence operations for user aggregate.
///
/// Uniqueness of email and username is enforced by the store, atomically.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Overwrite the stored record with the same ID. Performs no authorization.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` - New username belongs to another user
    /// * `EmailAlreadyExists` - New email belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;
}

use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::JwtError;
use chrono::Duration;
use chrono::Utc;
use tokio::sync::Semaphore;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserSession;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account operations.
///
/// Password hashing and verification are CPU-bound; they run on the blocking
/// pool and at most `max_concurrent_hashes` of them at once.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    token_ttl: Duration,
    hashing_permits: Arc<Semaphore>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token signing, configured with the signing secret
    /// * `token_ttl` - Lifetime of minted session tokens
    /// * `max_concurrent_hashes` - Admission limit for hashing work (at least 1)
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
        token_ttl: Duration,
        max_concurrent_hashes: usize,
    ) -> Self {
        Self {
            repository,
            authenticator,
            token_ttl,
            hashing_permits: Arc::new(Semaphore::new(max_concurrent_hashes.max(1))),
        }
    }

    async fn run_blocking<T, F>(&self, work: F) -> Result<T, UserError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.hashing_permits)
            .acquire_owned()
            .await
            .map_err(|e| UserError::Unknown(e.to_string()))?;

        // The permit travels with the blocking task: a cancelled caller does
        // not release it while the hash is still running.
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            work(&authenticator)
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))
    }

    async fn hash_password(&self, password: Password) -> Result<String, UserError> {
        self.run_blocking(move |authenticator| authenticator.hash_password(password.as_str()))
            .await?
            .map_err(|e| UserError::HashingFailed(e.to_string()))
    }

    fn issue_token(&self, user_id: &UserId) -> Result<String, UserError> {
        self.authenticator
            .issue_token(user_id, self.token_ttl)
            .map_err(|e| UserError::Unknown(format!("Token generation failed: {}", e)))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(
        &self,
        command: RegisterUserCommand,
    ) -> Result<UserSession, UserError> {
        let password_hash = self.hash_password(command.password).await?;
        let now = Utc::now();

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            bio: command.bio,
            image: command.image,
            created_at: now,
            updated_at: now,
        };

        let created_user = self.repository.create(user).await.map_err(|e| {
            if e.is_duplicate() {
                tracing::debug!(error = %e, "Registration rejected");
            }
            e
        })?;
        let token = self.issue_token(&created_user.id)?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(UserSession {
            user: created_user,
            token,
        })
    }

    async fn login(&self, command: LoginCommand) -> Result<UserSession, UserError> {
        let LoginCommand { email, password } = command;

        let Some(user) = self.repository.find_by_email(&email).await? else {
            // Spend the same hashing work as a real verification.
            let _ = self
                .run_blocking(move |authenticator| authenticator.hash_password(password.as_str()))
                .await;
            tracing::debug!("Login failed: unknown email");
            return Err(UserError::InvalidCredentials);
        };

        let stored_hash = user.password_hash.clone();
        let subject = user.id;
        let ttl = self.token_ttl;

        let outcome = self
            .run_blocking(move |authenticator| {
                authenticator.authenticate(password.as_str(), &stored_hash, subject, ttl)
            })
            .await?;

        match outcome {
            Ok(result) => {
                tracing::info!(user_id = %user.id, "User logged in");
                Ok(UserSession {
                    user,
                    token: result.access_token,
                })
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::debug!(user_id = %user.id, "Login failed: wrong password");
                Err(UserError::InvalidCredentials)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::error!(user_id = %user.id, error = %e, "Stored password hash is unusable");
                Err(UserError::InvalidCredentials)
            }
            Err(AuthenticationError::JwtError(e)) => Err(UserError::Unknown(format!(
                "Token generation failed: {}",
                e
            ))),
        }
    }

    async fn current_user(&self, token: &str) -> Result<User, UserError> {
        let user_id = self.authenticate_token(token)?;

        self.repository.find_by_id(&user_id).await?.ok_or_else(|| {
            tracing::debug!(user_id = %user_id, "Token subject no longer exists");
            UserError::TokenInvalid
        })
    }

    fn authenticate_token(&self, token: &str) -> Result<UserId, UserError> {
        let subject = self.authenticator.verify_token(token).map_err(|e| match e {
            JwtError::TokenExpired => UserError::TokenExpired,
            other => {
                tracing::debug!(error = %other, "Token verification failed");
                UserError::TokenInvalid
            }
        })?;

        UserId::from_string(&subject).map_err(|_| UserError::TokenInvalid)
    }

    async fn update_user(
        &self,
        auth_user_id: &UserId,
        mut command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(auth_user_id)
            .await?
            .ok_or_else(|| UserError::NotFound(auth_user_id.to_string()))?;

        user.apply_profile_changes(&mut command);

        if let Some(new_password) = command.password.take() {
            user.password_hash = self.hash_password(new_password).await?;
        }

        user.updated_at = Utc::now();

        let updated_user = self.repository.update(user).await?;
        tracing::info!(user_id = %updated_user.id, "User updated");

        Ok(updated_user)
    }
}

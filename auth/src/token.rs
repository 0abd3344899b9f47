use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Issues and verifies stateless session tokens.
///
/// A token carries the subject and its expiry, signed with the secret handed
/// to [`TokenService::new`]. Verification needs no server-side state; a token
/// is valid until `exp` and cannot be revoked.
pub struct TokenService {
    jwt_handler: JwtHandler,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
        }
    }

    /// Mint a token for `subject` expiring `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue(&self, subject: impl ToString, ttl: Duration) -> Result<String, JwtError> {
        self.jwt_handler.encode(&Claims::for_subject(subject, ttl))
    }

    /// Verify a token and return its subject.
    ///
    /// # Errors
    /// * `TokenExpired` - Current time is past `exp`
    /// * `InvalidToken` - Any other verification failure
    pub fn verify(&self, token: &str) -> Result<String, JwtError> {
        let claims: Claims = self.jwt_handler.decode(token)?;
        Ok(claims.sub)
    }
}

use async_trait::async_trait;

use crate::domain::profile::errors::ProfileError;
use crate::domain::profile::models::FollowEdge;
use crate::domain::profile::models::Profile;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;

/// Port for profile views and follow actions.
#[async_trait]
pub trait ProfileServicePort: Send + Sync + 'static {
    /// Resolve the public profile of `username` as seen by `viewer`.
    ///
    /// # Errors
    /// * `NotFound` - No user with this username
    async fn get_profile(
        &self,
        username: &Username,
        viewer: Option<&UserId>,
    ) -> Result<Profile, ProfileError>;

    /// Make `follower` follow `username`.
    ///
    /// # Returns
    /// Target profile with `following = true`
    ///
    /// # Errors
    /// * `NotFound` - No user with this username
    /// * `SelfFollow` - Target is the follower
    /// * `AlreadyFollowing` - Edge already exists
    async fn follow(&self, follower: &UserId, username: &Username)
        -> Result<Profile, ProfileError>;

    /// Remove the edge from `follower` to `username`; absent edges are not an error.
    ///
    /// # Returns
    /// Target profile with `following = false`
    ///
    /// # Errors
    /// * `NotFound` - No user with this username
    async fn unfollow(
        &self,
        follower: &UserId,
        username: &Username,
    ) -> Result<Profile, ProfileError>;
}

/// Persistence of directed follow edges.
///
/// The store guarantees at most one edge per ordered pair, atomically.
#[async_trait]
pub trait FollowRepository: Send + Sync + 'static {
    /// Insert an edge.
    ///
    /// # Errors
    /// * `AlreadyFollowing` - Edge already exists
    /// * `SelfFollow` - Follower and followed are the same user
    /// * `DatabaseError` - Database operation failed
    async fn follow(&self, edge: &FollowEdge) -> Result<(), ProfileError>;

    /// Delete an edge if present.
    ///
    /// # Returns
    /// Whether an edge was removed
    async fn unfollow(&self, edge: &FollowEdge) -> Result<bool, ProfileError>;

    /// Point lookup of a single edge.
    async fn is_following(&self, edge: &FollowEdge) -> Result<bool, ProfileError>;
}

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::profile::errors::ProfileError;
use crate::domain::profile::models::FollowEdge;
use crate::domain::profile::models::Profile;
use crate::domain::profile::ports::FollowRepository;
use crate::domain::profile::ports::ProfileServicePort;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::ports::UserRepository;

/// Resolves profiles and manages follow edges.
///
/// The `following` flag is computed in two steps: load the target, then a
/// point lookup of the single (viewer, target) edge.
pub struct ProfileService<UR, FR>
where
    UR: UserRepository,
    FR: FollowRepository,
{
    users: Arc<UR>,
    follows: Arc<FR>,
}

impl<UR, FR> ProfileService<UR, FR>
where
    UR: UserRepository,
    FR: FollowRepository,
{
    pub fn new(users: Arc<UR>, follows: Arc<FR>) -> Self {
        Self { users, follows }
    }

    async fn target(&self, username: &Username) -> Result<User, ProfileError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| ProfileError::NotFound(username.to_string()))
    }
}

#[async_trait]
impl<UR, FR> ProfileServicePort for ProfileService<UR, FR>
where
    UR: UserRepository,
    FR: FollowRepository,
{
    async fn get_profile(
        &self,
        username: &Username,
        viewer: Option<&UserId>,
    ) -> Result<Profile, ProfileError> {
        let target = self.target(username).await?;

        let following = match viewer {
            Some(viewer_id) => {
                self.follows
                    .is_following(&FollowEdge::new(*viewer_id, target.id))
                    .await?
            }
            None => false,
        };

        Ok(Profile::of(&target, following))
    }

    async fn follow(
        &self,
        follower: &UserId,
        username: &Username,
    ) -> Result<Profile, ProfileError> {
        let target = self.target(username).await?;
        let edge = FollowEdge::new(*follower, target.id);

        if edge.is_self_follow() {
            return Err(ProfileError::SelfFollow);
        }

        self.follows.follow(&edge).await?;
        tracing::info!(follower_id = %follower, followed_id = %target.id, "User followed");

        Ok(Profile::of(&target, true))
    }

    async fn unfollow(
        &self,
        follower: &UserId,
        username: &Username,
    ) -> Result<Profile, ProfileError> {
        let target = self.target(username).await?;
        let edge = FollowEdge::new(*follower, target.id);

        if self.follows.unfollow(&edge).await? {
            tracing::info!(follower_id = %follower, followed_id = %target.id, "User unfollowed");
        } else {
            tracing::debug!(follower_id = %follower, followed_id = %target.id, "No edge to remove");
        }

        Ok(Profile::of(&target, false))
    }
}

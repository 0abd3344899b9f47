use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;

/// Public projection of a user, relative to a viewer.
///
/// Carries neither email nor password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub username: Username,
    pub bio: Option<String>,
    pub image: Option<String>,
    /// Whether the viewer follows this user; `false` for anonymous viewers.
    pub following: bool,
}

impl Profile {
    pub fn of(user: &User, following: bool) -> Self {
        Self {
            username: user.username.clone(),
            bio: user.bio.clone(),
            image: user.image.clone(),
            following,
        }
    }
}

/// Directed relationship: `follower_id` follows `followed_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FollowEdge {
    pub follower_id: UserId,
    pub followed_id: UserId,
}

impl FollowEdge {
    pub fn new(follower_id: UserId, followed_id: UserId) -> Self {
        Self {
            follower_id,
            followed_id,
        }
    }

    pub fn is_self_follow(&self) -> bool {
        self.follower_id == self.followed_id
    }
}

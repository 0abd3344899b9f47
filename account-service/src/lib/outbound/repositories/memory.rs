//! In-process adapters for the repository ports.
//!
//! Uniqueness checks and writes happen under one write lock, so concurrent
//! callers observe the same guarantees as the Postgres constraints.

use std::collections::HashMap;
use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::profile::errors::ProfileError;
use crate::domain::profile::models::FollowEdge;
use crate::domain::profile::ports::FollowRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(Default)]
struct UserTable {
    by_id: HashMap<UserId, User>,
    by_username: HashMap<Username, UserId>,
    by_email: HashMap<EmailAddress, UserId>,
}

impl UserTable {
    /// First unique key of `user` already owned by a different record.
    fn conflict(&self, user: &User) -> Option<UserError> {
        let taken_by_other = |owner: Option<&UserId>| owner.is_some_and(|id| *id != user.id);

        if taken_by_other(self.by_username.get(&user.username)) {
            return Some(UserError::UsernameAlreadyExists(user.username.to_string()));
        }
        if taken_by_other(self.by_email.get(&user.email)) {
            return Some(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        None
    }

    fn insert(&mut self, user: User) {
        self.by_username.insert(user.username.clone(), user.id);
        self.by_email.insert(user.email.clone(), user.id);
        self.by_id.insert(user.id, user);
    }

    fn lookup(&self, id: Option<&UserId>) -> Option<User> {
        id.and_then(|id| self.by_id.get(id)).cloned()
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut table = self.table.write().await;

        if let Some(conflict) = table.conflict(&user) {
            return Err(conflict);
        }
        if table.by_id.contains_key(&user.id) {
            return Err(UserError::DatabaseError(format!("duplicate id {}", user.id)));
        }

        table.insert(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.table.read().await.lookup(Some(id)))
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let table = self.table.read().await;
        Ok(table.lookup(table.by_username.get(username)))
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let table = self.table.read().await;
        Ok(table.lookup(table.by_email.get(email)))
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut table = self.table.write().await;

        let Some(previous) = table.by_id.get(&user.id) else {
            return Err(UserError::NotFound(user.id.to_string()));
        };
        if let Some(conflict) = table.conflict(&user) {
            return Err(conflict);
        }

        let (old_username, old_email) = (previous.username.clone(), previous.email.clone());
        table.by_username.remove(&old_username);
        table.by_email.remove(&old_email);
        table.insert(user.clone());

        Ok(user)
    }
}

#[derive(Default)]
pub struct InMemoryFollowRepository {
    edges: RwLock<HashSet<FollowEdge>>,
}

impl InMemoryFollowRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FollowRepository for InMemoryFollowRepository {
    async fn follow(&self, edge: &FollowEdge) -> Result<(), ProfileError> {
        if edge.is_self_follow() {
            return Err(ProfileError::SelfFollow);
        }

        if self.edges.write().await.insert(*edge) {
            Ok(())
        } else {
            Err(ProfileError::AlreadyFollowing)
        }
    }

    async fn unfollow(&self, edge: &FollowEdge) -> Result<bool, ProfileError> {
        Ok(self.edges.write().await.remove(edge))
    }

    async fn is_following(&self, edge: &FollowEdge) -> Result<bool, ProfileError> {
        Ok(self.edges.read().await.contains(edge))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;

    fn user(name: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            username: Username::new(name.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            bio: None,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryUserRepository::new();
        let alice = repository
            .create(user("alice", "alice@x.com"))
            .await
            .unwrap();

        let by_id = repository.find_by_id(&alice.id).await.unwrap();
        let by_username = repository.find_by_username(&alice.username).await.unwrap();
        let by_email = repository.find_by_email(&alice.email).await.unwrap();

        assert_eq!(by_id.as_ref(), Some(&alice));
        assert_eq!(by_username.as_ref(), Some(&alice));
        assert_eq!(by_email.as_ref(), Some(&alice));
        assert!(repository.find_by_id(&UserId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_leaves_first_user_intact() {
        let repository = InMemoryUserRepository::new();
        let alice = repository
            .create(user("alice", "alice@x.com"))
            .await
            .unwrap();

        let result = repository.create(user("alice2", "ALICE@x.com")).await;

        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
        assert_eq!(
            repository.find_by_email(&alice.email).await.unwrap(),
            Some(alice)
        );
        let alice2 = Username::new("alice2".to_string()).unwrap();
        assert!(repository.find_by_username(&alice2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let repository = InMemoryUserRepository::new();
        repository
            .create(user("alice", "alice@x.com"))
            .await
            .unwrap();

        let result = repository.create(user("alice", "other@x.com")).await;
        assert!(matches!(result, Err(UserError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_concurrent_creates_with_same_email() {
        let repository = Arc::new(InMemoryUserRepository::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repository = Arc::clone(&repository);
                tokio::spawn(async move {
                    repository
                        .create(user(&format!("user{}", i), "same@x.com"))
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert!(e.is_duplicate()),
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn test_update_reindexes_unique_keys() {
        let repository = InMemoryUserRepository::new();
        let mut alice = repository
            .create(user("alice", "alice@x.com"))
            .await
            .unwrap();
        let old_username = alice.username.clone();

        alice.username = Username::new("alicia".to_string()).unwrap();
        repository.update(alice.clone()).await.unwrap();

        assert!(repository
            .find_by_username(&old_username)
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            repository.find_by_username(&alice.username).await.unwrap(),
            Some(alice)
        );

        // The released name is free again.
        repository
            .create(user("alice", "new@x.com"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_collision_and_missing_record() {
        let repository = InMemoryUserRepository::new();
        repository.create(user("bob", "bob@x.com")).await.unwrap();
        let mut alice = repository
            .create(user("alice", "alice@x.com"))
            .await
            .unwrap();

        alice.email = EmailAddress::new("bob@x.com".to_string()).unwrap();
        let collision = repository.update(alice).await;
        assert!(matches!(collision, Err(UserError::EmailAlreadyExists(_))));

        let missing = repository.update(user("carol", "carol@x.com")).await;
        assert!(matches!(missing, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_keeping_own_keys() {
        let repository = InMemoryUserRepository::new();
        let mut alice = repository
            .create(user("alice", "alice@x.com"))
            .await
            .unwrap();

        alice.bio = Some("hello".to_string());
        let updated = repository.update(alice).await.unwrap();

        assert_eq!(updated.bio.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_follow_twice_keeps_single_edge() {
        let repository = InMemoryFollowRepository::new();
        let edge = FollowEdge::new(UserId::new(), UserId::new());

        repository.follow(&edge).await.unwrap();
        let second = repository.follow(&edge).await;

        assert!(matches!(second, Err(ProfileError::AlreadyFollowing)));
        assert!(repository.unfollow(&edge).await.unwrap());
        assert!(!repository.unfollow(&edge).await.unwrap());
    }

    #[tokio::test]
    async fn test_follow_unfollow_is_following() {
        let repository = InMemoryFollowRepository::new();
        let (alice, bob) = (UserId::new(), UserId::new());
        let edge = FollowEdge::new(alice, bob);

        assert!(!repository.is_following(&edge).await.unwrap());
        repository.follow(&edge).await.unwrap();
        assert!(repository.is_following(&edge).await.unwrap());
        assert!(!repository
            .is_following(&FollowEdge::new(bob, alice))
            .await
            .unwrap());

        repository.unfollow(&edge).await.unwrap();
        assert!(!repository.is_following(&edge).await.unwrap());
    }

    #[tokio::test]
    async fn test_self_follow_rejected() {
        let repository = InMemoryFollowRepository::new();
        let alice = UserId::new();

        let result = repository.follow(&FollowEdge::new(alice, alice)).await;
        assert!(matches!(result, Err(ProfileError::SelfFollow)));
    }

    #[tokio::test]
    async fn test_concurrent_follows() {
        let repository = Arc::new(InMemoryFollowRepository::new());
        let edge = FollowEdge::new(UserId::new(), UserId::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repository = Arc::clone(&repository);
                tokio::spawn(async move { repository.follow(&edge).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(e) => assert!(matches!(e, ProfileError::AlreadyFollowing)),
            }
        }
        assert_eq!(successes, 1);
    }
}

//! Postgres adapters against a real database.
//!
//! Needs a reachable Postgres (`DATABASE_URL`, default port 5433):
//! `cargo test -p account-service --test repository_tests -- --ignored`

mod common;

use account_service::domain::profile::errors::ProfileError;
use account_service::domain::profile::models::FollowEdge;
use account_service::domain::profile::ports::FollowRepository;
use account_service::domain::user::models::EmailAddress;
use account_service::domain::user::models::User;
use account_service::domain::user::models::UserId;
use account_service::domain::user::models::Username;
use account_service::domain::user::ports::UserRepository;
use account_service::outbound::repositories::PostgresFollowRepository;
use account_service::outbound::repositories::PostgresUserRepository;
use account_service::user::errors::UserError;
use chrono::Utc;
use common::TestDb;

fn user(name: &str) -> User {
    let now = Utc::now();
    User {
        id: UserId::new(),
        username: Username::new(name.to_string()).unwrap(),
        email: EmailAddress::new(format!("{}@example.com", name)).unwrap(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        bio: None,
        image: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_create_then_find_by_every_key() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());

    let alice = users.create(user("alice")).await.unwrap();

    let by_id = users.find_by_id(&alice.id).await.unwrap().unwrap();
    let by_username = users.find_by_username(&alice.username).await.unwrap().unwrap();
    let by_email = users.find_by_email(&alice.email).await.unwrap().unwrap();

    for found in [by_id, by_username, by_email] {
        assert_eq!(found.id, alice.id);
        assert_eq!(found.username, alice.username);
        assert_eq!(found.email, alice.email);
        assert_eq!(found.password_hash, alice.password_hash);
    }

    let unknown = Username::new("nobody".to_string()).unwrap();
    assert!(users.find_by_username(&unknown).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_create_duplicate_username() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    users.create(user("alice")).await.unwrap();

    let mut clash = user("alice");
    clash.email = EmailAddress::new("other@example.com".to_string()).unwrap();

    let err = users.create(clash).await.unwrap_err();
    assert!(matches!(err, UserError::UsernameAlreadyExists(ref name) if name == "alice"));
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_create_duplicate_email() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    users.create(user("alice")).await.unwrap();

    let mut clash = user("alice2");
    clash.email = EmailAddress::new("alice@example.com".to_string()).unwrap();

    let err = users.create(clash).await.unwrap_err();
    assert!(matches!(err, UserError::EmailAlreadyExists(ref email) if email == "alice@example.com"));
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_update_persists_fields() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let mut alice = users.create(user("alice")).await.unwrap();

    alice.bio = Some("I like tea".to_string());
    alice.username = Username::new("alice_b".to_string()).unwrap();
    alice.updated_at = Utc::now();
    users.update(alice.clone()).await.unwrap();

    let stored = users.find_by_id(&alice.id).await.unwrap().unwrap();
    assert_eq!(stored.bio.as_deref(), Some("I like tea"));
    assert_eq!(stored.username.as_str(), "alice_b");

    let old_name = Username::new("alice".to_string()).unwrap();
    assert!(users.find_by_username(&old_name).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_update_collisions() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let alice = users.create(user("alice")).await.unwrap();
    users.create(user("bob")).await.unwrap();

    let mut takes_username = alice.clone();
    takes_username.username = Username::new("bob".to_string()).unwrap();
    let err = users.update(takes_username).await.unwrap_err();
    assert!(matches!(err, UserError::UsernameAlreadyExists(_)));

    let mut takes_email = alice.clone();
    takes_email.email = EmailAddress::new("bob@example.com".to_string()).unwrap();
    let err = users.update(takes_email).await.unwrap_err();
    assert!(matches!(err, UserError::EmailAlreadyExists(_)));
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_update_unknown_user() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());

    let err = users.update(user("ghost")).await.unwrap_err();
    assert!(matches!(err, UserError::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_follow_lifecycle() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let follows = PostgresFollowRepository::new(db.pool.clone());
    let alice = users.create(user("alice")).await.unwrap();
    let bob = users.create(user("bob")).await.unwrap();

    let edge = FollowEdge::new(alice.id, bob.id);
    assert!(!follows.is_following(&edge).await.unwrap());

    follows.follow(&edge).await.unwrap();
    assert!(follows.is_following(&edge).await.unwrap());
    assert!(!follows
        .is_following(&FollowEdge::new(bob.id, alice.id))
        .await
        .unwrap());

    let err = follows.follow(&edge).await.unwrap_err();
    assert!(matches!(err, ProfileError::AlreadyFollowing));

    assert!(follows.unfollow(&edge).await.unwrap());
    assert!(!follows.unfollow(&edge).await.unwrap());
    assert!(!follows.is_following(&edge).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_self_follow_rejected_by_check_constraint() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let follows = PostgresFollowRepository::new(db.pool.clone());
    let alice = users.create(user("alice")).await.unwrap();

    let err = follows
        .follow(&FollowEdge::new(alice.id, alice.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ProfileError::SelfFollow));
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_follow_unknown_user() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let follows = PostgresFollowRepository::new(db.pool.clone());
    let alice = users.create(user("alice")).await.unwrap();

    let err = follows
        .follow(&FollowEdge::new(alice.id, UserId::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, ProfileError::NotFound(_)));
}

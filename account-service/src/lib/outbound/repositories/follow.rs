use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::profile::errors::ProfileError;
use crate::domain::profile::models::FollowEdge;
use crate::domain::profile::ports::FollowRepository;

pub struct PostgresFollowRepository {
    pool: PgPool,
}

impl PostgresFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn follow(&self, edge: &FollowEdge) -> Result<(), ProfileError> {
        sqlx::query(
            r#"
            INSERT INTO follows (follower_id, followed_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(edge.follower_id.0)
        .bind(edge.followed_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return ProfileError::AlreadyFollowing;
                }
                if db_err.is_check_violation() {
                    return ProfileError::SelfFollow;
                }
                if db_err.is_foreign_key_violation() {
                    return ProfileError::NotFound(edge.followed_id.to_string());
                }
            }
            ProfileError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    async fn unfollow(&self, edge: &FollowEdge) -> Result<bool, ProfileError> {
        let result = sqlx::query(
            r#"
            DELETE FROM follows
            WHERE follower_id = $1 AND followed_id = $2
            "#,
        )
        .bind(edge.follower_id.0)
        .bind(edge.followed_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| ProfileError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_following(&self, edge: &FollowEdge) -> Result<bool, ProfileError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM follows
                WHERE follower_id = $1 AND followed_id = $2
            )
            "#,
        )
        .bind(edge.follower_id.0)
        .bind(edge.followed_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ProfileError::DatabaseError(e.to_string()))
    }
}

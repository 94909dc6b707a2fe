//! Users repository
//!
//! Data access for users and the profile relation: lookups with optional
//! relation loading, transactional create, partial update and delete.

use sqlx::SqlitePool;

use super::profiles::{ProfileRepository, generated_id};
use crate::entities::{User, UserWhere};
use crate::orm::{
    EntityQuery, RelationLoader, SqlValue, build_insert_sql, execute_with_binds,
};

/// Partial update for a user. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub first_name: Option<String>,
}

impl UpdateUser {
    /// Whether the patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
    }

    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        let mut set = Vec::new();
        if let Some(ref name) = self.first_name {
            set.push(("first_name", SqlValue::from(name.as_str())));
        }
        set
    }
}

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by ID, loading the named relations
    pub async fn find_one(&self, id: i32, relations: &[&str]) -> Result<Option<User>, sqlx::Error> {
        let mut user = EntityQuery::<User>::new()
            .filter(&UserWhere::by_id(id))
            .fetch_one(&self.pool)
            .await?;

        if let Some(ref mut u) = user {
            u.load_relations(&self.pool, relations).await?;
        }

        Ok(user)
    }

    /// List all users, loading the named relations in bulk
    pub async fn find(&self, relations: &[&str]) -> Result<Vec<User>, sqlx::Error> {
        let mut users = EntityQuery::<User>::new()
            .default_order()
            .fetch_all(&self.pool)
            .await?;

        User::bulk_load_relations(&mut users, &self.pool, relations).await?;
        Ok(users)
    }

    /// Count all users
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        EntityQuery::<User>::new().count(&self.pool).await
    }

    /// Create a profile and a user referencing it in one transaction.
    ///
    /// If either insert fails the transaction is dropped and both rows are
    /// rolled back, so no orphaned profile is left behind.
    pub async fn create_with_profile(
        &self,
        first_name: &str,
        gender: &str,
    ) -> Result<User, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let profile = ProfileRepository::save(&mut tx, gender).await?;

        let (sql, values) = build_insert_sql::<User>(&[
            ("first_name", SqlValue::from(first_name)),
            ("profile_id", SqlValue::from(profile.id)),
        ]);
        let result = execute_with_binds(&sql, &values, &mut *tx).await?;
        let id = generated_id(result.last_insert_rowid())?;

        tx.commit().await?;

        tracing::debug!(user_id = id, profile_id = profile.id, "User created");

        Ok(User {
            id,
            first_name: first_name.to_string(),
            profile_id: profile.id,
            profile: Some(profile),
        })
    }

    /// Apply a partial update; returns the number of rows changed.
    /// An empty patch does not touch the store.
    pub async fn update(&self, id: i32, patch: &UpdateUser) -> Result<u64, sqlx::Error> {
        if patch.is_empty() {
            return Ok(0);
        }

        let (sql, values) = EntityQuery::<User>::new()
            .filter(&UserWhere::by_id(id))
            .build_update_sql(&patch.assignments());

        Ok(execute_with_binds(&sql, &values, &self.pool)
            .await?
            .rows_affected())
    }

    /// Delete a user; returns the number of rows removed.
    /// The user's profile is kept.
    pub async fn delete(&self, id: i32) -> Result<u64, sqlx::Error> {
        let (sql, values) = EntityQuery::<User>::new()
            .filter(&UserWhere::by_id(id))
            .build_delete_sql();

        Ok(execute_with_binds(&sql, &values, &self.pool)
            .await?
            .rows_affected())
    }
}

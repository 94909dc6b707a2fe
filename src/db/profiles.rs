//! Profiles repository
//!
//! Profiles have no standalone write path through the API; they are only
//! inserted as part of creating a user.

use sqlx::{SqliteConnection, SqlitePool};

use crate::entities::Profile;
use crate::orm::{EntityQuery, SqlValue, build_insert_sql, execute_with_binds};

pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Count all profiles
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        EntityQuery::<Profile>::new().count(&self.pool).await
    }

    /// Insert a profile on the given connection (typically a transaction)
    /// and return it with its generated id.
    pub async fn save(conn: &mut SqliteConnection, gender: &str) -> Result<Profile, sqlx::Error> {
        let (sql, values) = build_insert_sql::<Profile>(&[("gender", SqlValue::from(gender))]);
        let result = execute_with_binds(&sql, &values, &mut *conn).await?;

        Ok(Profile {
            id: generated_id(result.last_insert_rowid())?,
            gender: gender.to_string(),
        })
    }
}

/// Narrow a SQLite rowid to the GraphQL `Int` range
pub(crate) fn generated_id(rowid: i64) -> Result<i32, sqlx::Error> {
    i32::try_from(rowid).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

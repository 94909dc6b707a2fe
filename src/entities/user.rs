use std::collections::HashMap;

use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::profile::{Profile, ProfileWhere};
use crate::orm::{
    ColumnDef, DatabaseEntity, DatabaseFilter, DatabaseSchema, EntityQuery, FromSqlRow,
    IntFilter, RelationLoader, RelationMetadata, SqlValue,
};

/// Relation name for a user's profile, matching the GraphQL field.
pub const PROFILE_RELATION: &str = "profile";

/// A user account and its linked profile
#[derive(SimpleObject, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub first_name: String,
    /// Only populated when the relation was loaded
    #[serde(default)]
    pub profile: Option<Profile>,
    pub profile_id: i32,
}

static USER_COLUMNS: [ColumnDef; 3] = [
    ColumnDef::primary_key("id"),
    ColumnDef::new("first_name", "TEXT"),
    ColumnDef::new("profile_id", "INTEGER").references("profiles(id)"),
];

static USER_RELATIONS: [RelationMetadata; 1] = [RelationMetadata {
    field_name: PROFILE_RELATION,
    target_table: <Profile as DatabaseEntity>::TABLE_NAME,
}];

impl DatabaseEntity for User {
    const TABLE_NAME: &'static str = "users";
    const PRIMARY_KEY: &'static str = "id";
    const DEFAULT_SORT: &'static str = "id";

    fn column_names() -> &'static [&'static str] {
        &["id", "first_name", "profile_id"]
    }
}

impl DatabaseSchema for User {
    fn columns() -> &'static [ColumnDef] {
        &USER_COLUMNS
    }
}

impl FromSqlRow for User {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            profile: None,
            profile_id: row.try_get("profile_id")?,
        })
    }
}

impl RelationLoader for User {
    fn relations() -> &'static [RelationMetadata] {
        &USER_RELATIONS
    }

    async fn bulk_load_relations(
        entities: &mut [Self],
        pool: &SqlitePool,
        relations: &[&str],
    ) -> Result<(), sqlx::Error> {
        if entities.is_empty() || !relations.contains(&PROFILE_RELATION) {
            return Ok(());
        }

        let mut ids: Vec<i32> = entities.iter().map(|u| u.profile_id).collect();
        ids.sort_unstable();
        ids.dedup();

        tracing::debug!(
            relation = PROFILE_RELATION,
            target = USER_RELATIONS[0].target_table,
            parent_count = entities.len(),
            "Bulk loading relation"
        );

        let profiles: HashMap<i32, Profile> = EntityQuery::<Profile>::new()
            .filter(&ProfileWhere::by_ids(ids))
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        for user in entities.iter_mut() {
            user.profile = profiles.get(&user.profile_id).cloned();
        }

        Ok(())
    }
}

/// Filter for user queries
#[derive(Default, Clone, Debug)]
pub struct UserWhere {
    pub id: Option<IntFilter>,
}

impl UserWhere {
    pub fn by_id(id: i32) -> Self {
        Self {
            id: Some(IntFilter::eq(id)),
        }
    }
}

impl DatabaseFilter for UserWhere {
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        match self.id {
            Some(ref f) => f.to_sql_conditions(User::PRIMARY_KEY),
            None => (Vec::new(), Vec::new()),
        }
    }

    fn is_empty(&self) -> bool {
        self.id.as_ref().is_none_or(IntFilter::is_empty)
    }
}

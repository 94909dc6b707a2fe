use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::orm::{
    ColumnDef, DatabaseEntity, DatabaseFilter, DatabaseSchema, FromSqlRow, IntFilter, SqlValue,
};

/// Profile details owned by a user
#[derive(SimpleObject, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i32,
    pub gender: String,
}

static PROFILE_COLUMNS: [ColumnDef; 2] = [
    ColumnDef::primary_key("id"),
    ColumnDef::new("gender", "TEXT"),
];

impl DatabaseEntity for Profile {
    const TABLE_NAME: &'static str = "profiles";
    const PRIMARY_KEY: &'static str = "id";
    const DEFAULT_SORT: &'static str = "id";

    fn column_names() -> &'static [&'static str] {
        &["id", "gender"]
    }
}

impl DatabaseSchema for Profile {
    fn columns() -> &'static [ColumnDef] {
        &PROFILE_COLUMNS
    }
}

impl FromSqlRow for Profile {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            gender: row.try_get("gender")?,
        })
    }
}

/// Filter for profile queries
#[derive(Default, Clone, Debug)]
pub struct ProfileWhere {
    pub id: Option<IntFilter>,
}

impl ProfileWhere {
    pub fn by_ids(ids: Vec<i32>) -> Self {
        Self {
            id: Some(IntFilter::in_list(ids)),
        }
    }
}

impl DatabaseFilter for ProfileWhere {
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        match self.id {
            Some(ref f) => f.to_sql_conditions(Profile::PRIMARY_KEY),
            None => (Vec::new(), Vec::new()),
        }
    }

    fn is_empty(&self) -> bool {
        self.id.as_ref().is_none_or(IntFilter::is_empty)
    }
}

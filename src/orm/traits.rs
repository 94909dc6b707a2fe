//! Core traits for the ORM layer

use async_graphql::SelectionField;
use sqlx::{Arguments, SqlitePool};
use sqlx::sqlite::{SqliteArguments, SqliteRow};

/// Column definition for schema generation.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Column name in the database
    pub name: &'static str,
    /// SQLite column type (TEXT, INTEGER, REAL, BLOB)
    pub sql_type: &'static str,
    /// Whether the column can be NULL
    pub nullable: bool,
    /// Whether this is the primary key
    pub is_primary_key: bool,
    /// Whether the store generates the value (INTEGER primary keys only)
    pub auto_increment: bool,
    /// Foreign key target, e.g. `profiles(id)`
    pub references: Option<&'static str>,
    /// Default value expression (e.g., "datetime('now')")
    pub default: Option<&'static str>,
}

impl ColumnDef {
    /// A non-null column with no constraints
    pub const fn new(name: &'static str, sql_type: &'static str) -> Self {
        Self {
            name,
            sql_type,
            nullable: false,
            is_primary_key: false,
            auto_increment: false,
            references: None,
            default: None,
        }
    }

    /// An auto-incrementing INTEGER primary key
    pub const fn primary_key(name: &'static str) -> Self {
        Self {
            is_primary_key: true,
            auto_increment: true,
            ..Self::new(name, "INTEGER")
        }
    }

    /// Mark this column as a foreign key to `target` (`table(column)`)
    pub const fn references(mut self, target: &'static str) -> Self {
        self.references = Some(target);
        self
    }

    /// Generate the column definition SQL
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type);

        if self.is_primary_key {
            sql.push_str(" PRIMARY KEY");
            if self.auto_increment {
                sql.push_str(" AUTOINCREMENT");
            }
        }

        if !self.nullable && !self.is_primary_key {
            sql.push_str(" NOT NULL");
        }

        if let Some(default) = self.default {
            sql.push_str(&format!(" DEFAULT {}", default));
        }

        if let Some(target) = self.references {
            sql.push_str(&format!(" REFERENCES {}", target));
        }

        sql
    }
}

/// Trait for database schema generation and migration.
pub trait DatabaseSchema: DatabaseEntity {
    /// Get all column definitions for this entity's table
    fn columns() -> &'static [ColumnDef];

    /// Generate CREATE TABLE IF NOT EXISTS SQL
    fn create_table_sql() -> String {
        let column_defs: Vec<String> = Self::columns().iter().map(|c| c.to_sql()).collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
            Self::TABLE_NAME,
            column_defs.join(",\n  ")
        )
    }
}

/// Metadata about a database entity (table).
pub trait DatabaseEntity: Sized + Send + Sync {
    /// The SQL table name (e.g., "users")
    const TABLE_NAME: &'static str;

    /// The primary key column name (e.g., "id"), used by id filters
    const PRIMARY_KEY: &'static str;

    /// Default sort column for list queries
    const DEFAULT_SORT: &'static str;

    /// Default sort direction
    const DEFAULT_SORT_DIR: &'static str = "ASC";

    /// List of all column names in the table
    fn column_names() -> &'static [&'static str];

    /// Build a SELECT query for all columns
    fn select_sql() -> String {
        let columns = Self::column_names().join(", ");
        format!("SELECT {} FROM {}", columns, Self::TABLE_NAME)
    }
}

/// Trait for applying filters to a SQL query.
///
/// Implemented by the per-entity `*Where` structs.
pub trait DatabaseFilter: Send + Sync {
    /// WHERE clause fragments (with `?` placeholders) and the values to bind.
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>);

    /// Check if the filter has any conditions
    fn is_empty(&self) -> bool;
}

/// Trait for decoding a database row into an entity.
pub trait FromSqlRow: Sized {
    /// Decode a SQLite row into this entity type
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;
}

/// Relation metadata for look_ahead traversal.
#[derive(Debug, Clone)]
pub struct RelationMetadata {
    /// GraphQL field name of the relation (e.g. "profile")
    pub field_name: &'static str,
    /// Table the related rows live in
    pub target_table: &'static str,
}

/// Trait for loading relations by name.
///
/// Resolvers derive the names from the GraphQL selection set with
/// [requested_relations] so only relations a client asked for are queried.
#[allow(async_fn_in_trait)]
pub trait RelationLoader: Sized + Send + Sync {
    /// Relations this entity can load
    fn relations() -> &'static [RelationMetadata];

    /// Load relations for multiple entities in bulk to avoid N+1 queries.
    ///
    /// Collects the foreign keys of all entities and loads each relation
    /// with a single query.
    async fn bulk_load_relations(
        entities: &mut [Self],
        pool: &SqlitePool,
        relations: &[&str],
    ) -> Result<(), sqlx::Error>;

    /// Load relations for a single entity.
    async fn load_relations(
        &mut self,
        pool: &SqlitePool,
        relations: &[&str],
    ) -> Result<(), sqlx::Error> {
        Self::bulk_load_relations(std::slice::from_mut(self), pool, relations).await
    }
}

/// Names of the relations of `E` that appear in a GraphQL selection set.
pub fn requested_relations<E: RelationLoader>(selection: &[SelectionField<'_>]) -> Vec<&'static str> {
    E::relations()
        .iter()
        .filter(|rel| selection.iter().any(|f| f.name() == rel.field_name))
        .map(|rel| rel.field_name)
        .collect()
}

/// Represents a SQL value that can be bound to a query.
///
/// Used by filters and write helpers to collect values for parameterized queries.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    Int(i64),
}

/// Collect values into positional arguments for `query_with` and friends.
pub fn bind_values(values: &[SqlValue]) -> Result<SqliteArguments<'_>, sqlx::Error> {
    let mut args = SqliteArguments::default();
    for value in values {
        let added = match value {
            SqlValue::String(s) => args.add(s.as_str()),
            SqlValue::Int(i) => args.add(*i),
        };
        added.map_err(sqlx::Error::Encode)?;
    }
    Ok(args)
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::String(value.to_string())
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_values_keeps_every_value() {
        let values = vec![SqlValue::from("Ada"), SqlValue::from(7)];
        let args = bind_values(&values).unwrap();
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_primary_key_column_sql() {
        assert_eq!(
            ColumnDef::primary_key("id").to_sql(),
            "id INTEGER PRIMARY KEY AUTOINCREMENT"
        );
    }

    #[test]
    fn test_foreign_key_column_sql() {
        let col = ColumnDef::new("profile_id", "INTEGER").references("profiles(id)");
        assert_eq!(
            col.to_sql(),
            "profile_id INTEGER NOT NULL REFERENCES profiles(id)"
        );
    }

    #[test]
    fn test_nullable_column_with_default() {
        let col = ColumnDef {
            nullable: true,
            default: Some("'x'"),
            ..ColumnDef::new("nickname", "TEXT")
        };
        assert_eq!(col.to_sql(), "nickname TEXT DEFAULT 'x'");
    }
}

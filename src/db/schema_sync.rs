//! Automatic schema synchronization from entity definitions
//!
//! ORM-like auto-migration:
//! - Compares entity definitions to the current database schema
//! - Creates missing tables
//! - Adds missing columns
//! - Does NOT handle column renames or type changes (requires DB wipe)

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::entities::{Profile, User};
use crate::orm::{ColumnDef, DatabaseSchema};

/// Result of a schema sync operation
#[derive(Debug, Default)]
pub struct SchemaSyncResult {
    pub tables_created: Vec<String>,
    pub columns_added: Vec<(String, String)>, // (table, column)
    pub errors: Vec<String>,
}

impl SchemaSyncResult {
    fn merge(&mut self, other: SchemaSyncResult) {
        self.tables_created.extend(other.tables_created);
        self.columns_added.extend(other.columns_added);
        self.errors.extend(other.errors);
    }
}

/// Check if a table exists in the database
async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool, sqlx::Error> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
            .bind(table_name)
            .fetch_optional(pool)
            .await?;

    Ok(result.is_some())
}

/// Get existing columns for a table
async fn get_table_columns(
    pool: &SqlitePool,
    table_name: &str,
) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(i32, String, String, i32, Option<String>, i32)> =
        sqlx::query_as(&format!("PRAGMA table_info({})", table_name))
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(|(_, name, _, _, _, _)| name).collect())
}

/// Sync a single entity's table to the database
pub async fn sync_entity<E: DatabaseSchema>(
    pool: &SqlitePool,
) -> Result<SchemaSyncResult, sqlx::Error> {
    let mut result = SchemaSyncResult::default();
    let table_name = E::TABLE_NAME;

    if !table_exists(pool, table_name).await? {
        let create_sql = E::create_table_sql();
        debug!("Creating table {}: {}", table_name, create_sql);

        match sqlx::query(&create_sql).execute(pool).await {
            Ok(_) => {
                info!("Created table: {}", table_name);
                result.tables_created.push(table_name.to_string());
            }
            Err(e) => {
                let msg = format!("Failed to create table {}: {}", table_name, e);
                warn!("{}", msg);
                result.errors.push(msg);
            }
        }
    } else {
        let existing_columns = get_table_columns(pool, table_name).await?;

        for col_def in E::columns() {
            if existing_columns.iter().any(|c| c == col_def.name) {
                continue;
            }

            let alter_sql = match generate_add_column_sql(table_name, col_def) {
                Ok(sql) => sql,
                Err(msg) => {
                    warn!("{}", msg);
                    result.errors.push(msg);
                    continue;
                }
            };
            debug!("Adding column to {}: {}", table_name, alter_sql);

            match sqlx::query(&alter_sql).execute(pool).await {
                Ok(_) => {
                    info!("Added column {}.{}", table_name, col_def.name);
                    result
                        .columns_added
                        .push((table_name.to_string(), col_def.name.to_string()));
                }
                Err(e) => {
                    let msg = format!(
                        "Failed to add column {}.{}: {}",
                        table_name, col_def.name, e
                    );
                    warn!("{}", msg);
                    result.errors.push(msg);
                }
            }
        }
    }

    Ok(result)
}

/// Generate ALTER TABLE ADD COLUMN SQL.
///
/// SQLite only adds a REFERENCES column when its default is NULL, so a
/// non-null foreign key cannot be added to an existing table and is
/// reported instead.
fn generate_add_column_sql(table_name: &str, col: &ColumnDef) -> Result<String, String> {
    let mut sql = format!(
        "ALTER TABLE {} ADD COLUMN {} {}",
        table_name, col.name, col.sql_type
    );

    if let Some(target) = col.references {
        if !col.nullable {
            return Err(format!(
                "Cannot add NOT NULL foreign key column {}.{} to an existing table; recreate the table",
                table_name, col.name
            ));
        }
        sql.push_str(&format!(" REFERENCES {}", target));
        return Ok(sql);
    }

    // SQLite rejects ADD COLUMN ... NOT NULL without a default
    if let Some(default) = col.default {
        sql.push_str(&format!(" DEFAULT {}", default));
    } else if !col.nullable {
        let default_val = match col.sql_type {
            "INTEGER" => "0",
            "REAL" => "0.0",
            _ => "''",
        };
        sql.push_str(&format!(" NOT NULL DEFAULT {}", default_val));
    }

    Ok(sql)
}

/// Sync all entity tables to the database.
///
/// Called at startup before the server accepts requests. Referenced tables
/// are synced before the tables that reference them.
pub async fn sync_all_entity_schemas(pool: &SqlitePool) -> SchemaSyncResult {
    let mut total_result = SchemaSyncResult::default();

    macro_rules! sync_one {
        ($entity:ty) => {
            match sync_entity::<$entity>(pool).await {
                Ok(result) => total_result.merge(result),
                Err(e) => {
                    total_result.errors.push(format!(
                        "Error syncing {}: {}",
                        stringify!($entity),
                        e
                    ));
                }
            }
        };
    }

    sync_one!(Profile);
    sync_one!(User);

    total_result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::db::Database;

    #[test]
    fn test_add_column_sql_gets_default_for_not_null() {
        let col = ColumnDef::new("first_name", "TEXT");
        assert_eq!(
            generate_add_column_sql("users", &col).unwrap(),
            "ALTER TABLE users ADD COLUMN first_name TEXT NOT NULL DEFAULT ''"
        );
    }

    #[test]
    fn test_add_column_sql_keeps_nullable_reference() {
        let col = ColumnDef {
            nullable: true,
            ..ColumnDef::new("profile_id", "INTEGER").references("profiles(id)")
        };
        assert_eq!(
            generate_add_column_sql("users", &col).unwrap(),
            "ALTER TABLE users ADD COLUMN profile_id INTEGER REFERENCES profiles(id)"
        );
    }

    #[tokio::test]
    async fn test_sync_reports_missing_required_foreign_key() {
        let db = Database::connect_in_memory().await.unwrap();
        sqlx::query("CREATE TABLE profiles (id INTEGER PRIMARY KEY AUTOINCREMENT, gender TEXT NOT NULL)")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, first_name TEXT NOT NULL)")
            .execute(db.pool())
            .await
            .unwrap();

        let result = sync_all_entity_schemas(db.pool()).await;

        assert!(result.columns_added.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("users.profile_id"), "{:?}", result.errors);

        let columns = get_table_columns(db.pool(), "users").await.unwrap();
        assert_eq!(columns, vec!["id", "first_name"]);
    }

    #[tokio::test]
    async fn test_sync_creates_tables_once() {
        let db = Database::connect_in_memory().await.unwrap();

        let first = sync_all_entity_schemas(db.pool()).await;
        assert!(first.errors.is_empty(), "{:?}", first.errors);
        assert_eq!(first.tables_created, vec!["profiles", "users"]);

        let second = sync_all_entity_schemas(db.pool()).await;
        assert!(second.errors.is_empty());
        assert!(second.tables_created.is_empty());
        assert!(second.columns_added.is_empty());
    }

    #[tokio::test]
    async fn test_sync_adds_missing_columns() {
        let db = Database::connect_in_memory().await.unwrap();
        sqlx::query("CREATE TABLE profiles (id INTEGER PRIMARY KEY AUTOINCREMENT)")
            .execute(db.pool())
            .await
            .unwrap();

        let result = sync_entity::<Profile>(db.pool()).await.unwrap();
        assert_eq!(
            result.columns_added,
            vec![("profiles".to_string(), "gender".to_string())]
        );
    }
}

//! SQL Query Builder for the ORM layer
//!
//! Provides a query builder that works with `DatabaseEntity` types
//! and uses parameterized queries via sqlx to prevent SQL injection.

use sqlx::sqlite::SqliteQueryResult;
use sqlx::{Executor, Sqlite, SqlitePool};

use super::traits::{DatabaseEntity, DatabaseFilter, FromSqlRow, SqlValue, bind_values};

/// A query builder for database entities.
///
/// Builds parameterized SQL for SELECT, COUNT, UPDATE and DELETE
/// statements scoped by the same WHERE clauses.
pub struct EntityQuery<E: DatabaseEntity> {
    _phantom: std::marker::PhantomData<E>,
    where_clauses: Vec<String>,
    values: Vec<SqlValue>,
    order_by: Option<String>,
    limit: Option<i64>,
    param_counter: usize,
}

impl<E: DatabaseEntity + FromSqlRow> EntityQuery<E> {
    /// Create a new query builder for the entity type.
    pub fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
            where_clauses: Vec::new(),
            values: Vec::new(),
            order_by: None,
            limit: None,
            param_counter: 0,
        }
    }

    /// Add a filter to the query.
    pub fn filter<F: DatabaseFilter>(mut self, filter: &F) -> Self {
        if !filter.is_empty() {
            let (conditions, values) = filter.to_sql_conditions();
            for condition in conditions {
                let rewritten = self.rewrite_params(&condition);
                self.where_clauses.push(rewritten);
            }
            self.values.extend(values);
        }
        self
    }

    /// Add default sorting if no order is specified.
    pub fn default_order(mut self) -> Self {
        if self.order_by.is_none() {
            self.order_by = Some(format!("{} {}", E::DEFAULT_SORT, E::DEFAULT_SORT_DIR));
        }
        self
    }

    /// Set limit directly.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Rewrite bare `?` placeholders to sequential `?N` indices.
    fn rewrite_params(&mut self, condition: &str) -> String {
        let mut result = String::with_capacity(condition.len() + 4);
        let mut chars = condition.chars().peekable();
        while let Some(c) = chars.next() {
            result.push(c);
            if c == '?' && !chars.peek().is_some_and(|n| n.is_ascii_digit()) {
                self.param_counter += 1;
                result.push_str(&self.param_counter.to_string());
            }
        }
        result
    }

    fn where_sql(&self) -> String {
        if self.where_clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.where_clauses.join(" AND "))
        }
    }

    /// Build the SQL query string.
    fn build_sql(&self) -> String {
        let mut sql = E::select_sql();
        sql.push_str(&self.where_sql());

        if let Some(ref order) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        sql
    }

    /// Build a COUNT query string.
    fn build_count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM {}{}", E::TABLE_NAME, self.where_sql())
    }

    /// Build an UPDATE for the rows matching the current filters.
    /// Returns `(sql, values)` so the caller can run it with [execute_with_binds].
    ///
    /// SET placeholders are numbered after the WHERE placeholders, so the
    /// returned values are the filter values followed by the assignments.
    pub fn build_update_sql(&self, assignments: &[(&'static str, SqlValue)]) -> (String, Vec<SqlValue>) {
        let mut counter = self.param_counter;
        let set_sql: Vec<String> = assignments
            .iter()
            .map(|(column, _)| {
                counter += 1;
                format!("{} = ?{}", column, counter)
            })
            .collect();

        let sql = format!(
            "UPDATE {} SET {}{}",
            E::TABLE_NAME,
            set_sql.join(", "),
            self.where_sql()
        );

        let mut values = self.values.clone();
        values.extend(assignments.iter().map(|(_, v)| v.clone()));
        (sql, values)
    }

    /// Build a DELETE query string and bind values for bulk delete by filter.
    /// Returns `(sql, values)` so the caller can run it with [execute_with_binds].
    pub fn build_delete_sql(&self) -> (String, Vec<SqlValue>) {
        let sql = format!("DELETE FROM {}{}", E::TABLE_NAME, self.where_sql());
        (sql, self.values.clone())
    }

    /// Execute the query and return all matching entities.
    pub async fn fetch_all(self, pool: &SqlitePool) -> Result<Vec<E>, sqlx::Error> {
        let sql = self.build_sql();
        tracing::debug!(sql = %sql, "Executing entity query");

        let rows = sqlx::query_with(&sql, bind_values(&self.values)?)
            .fetch_all(pool)
            .await?;
        rows.iter().map(E::from_row).collect()
    }

    /// Execute the query and return a single entity.
    pub async fn fetch_one(self, pool: &SqlitePool) -> Result<Option<E>, sqlx::Error> {
        let this = self.limit(1);
        let sql = this.build_sql();
        tracing::debug!(sql = %sql, "Executing entity query (one)");

        let row = sqlx::query_with(&sql, bind_values(&this.values)?)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => Ok(Some(E::from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Execute a COUNT query.
    pub async fn count(&self, pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let sql = self.build_count_sql();
        tracing::debug!(sql = %sql, "Executing count query");

        sqlx::query_scalar_with::<Sqlite, i64, _>(&sql, bind_values(&self.values)?)
            .fetch_one(pool)
            .await
    }
}

impl<E: DatabaseEntity + FromSqlRow> Default for EntityQuery<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an INSERT for `E` from `(column, value)` pairs.
pub fn build_insert_sql<E: DatabaseEntity>(
    values: &[(&'static str, SqlValue)],
) -> (String, Vec<SqlValue>) {
    let columns: Vec<&str> = values.iter().map(|(c, _)| *c).collect();
    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        E::TABLE_NAME,
        columns.join(", "),
        placeholders.join(", ")
    );
    (sql, values.iter().map(|(_, v)| v.clone()).collect())
}

/// Execute an INSERT/UPDATE/DELETE query with bound values.
///
/// Accepts any SQLite executor so writes can run on the pool or inside a
/// transaction (`&mut *tx`).
pub async fn execute_with_binds<'c, X>(
    sql: &str,
    values: &[SqlValue],
    executor: X,
) -> Result<SqliteQueryResult, sqlx::Error>
where
    X: Executor<'c, Database = Sqlite>,
{
    tracing::debug!(sql = %sql, params = values.len(), "Executing write");

    sqlx::query_with(sql, bind_values(values)?)
        .execute(executor)
        .await
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::entities::{Profile, User, UserWhere};
    use crate::orm::IntFilter;

    #[test]
    fn test_select_with_filter_and_order() {
        let query = EntityQuery::<User>::new()
            .filter(&UserWhere::by_id(4))
            .default_order()
            .limit(1);
        assert_eq!(
            query.build_sql(),
            "SELECT id, first_name, profile_id FROM users WHERE id = ?1 ORDER BY id ASC LIMIT 1"
        );
    }

    #[test]
    fn test_placeholders_are_numbered_across_filters() {
        let query = EntityQuery::<User>::new().filter(&UserWhere {
            id: Some(IntFilter {
                eq: Some(9),
                in_list: Some(vec![1, 2]),
            }),
        });
        assert_eq!(
            query.build_count_sql(),
            "SELECT COUNT(*) FROM users WHERE id = ?1 AND id IN (?2, ?3)"
        );
    }

    #[test]
    fn test_update_numbers_set_after_where() {
        let query = EntityQuery::<User>::new().filter(&UserWhere::by_id(7));
        let (sql, values) = query.build_update_sql(&[("first_name", SqlValue::from("Bob"))]);
        assert_eq!(sql, "UPDATE users SET first_name = ?2 WHERE id = ?1");
        assert_eq!(values, vec![SqlValue::Int(7), SqlValue::from("Bob")]);
    }

    #[test]
    fn test_delete_sql() {
        let (sql, values) = EntityQuery::<User>::new()
            .filter(&UserWhere::by_id(2))
            .build_delete_sql();
        assert_eq!(sql, "DELETE FROM users WHERE id = ?1");
        assert_eq!(values, vec![SqlValue::Int(2)]);
    }

    #[test]
    fn test_insert_sql() {
        let (sql, values) = build_insert_sql::<Profile>(&[("gender", SqlValue::from("F"))]);
        assert_eq!(sql, "INSERT INTO profiles (gender) VALUES (?1)");
        assert_eq!(values, vec![SqlValue::from("F")]);
    }
}

//! Column filters used by the entity `*Where` structs.

use super::traits::SqlValue;

/// Filter for integer columns
#[derive(Default, Clone, Debug, PartialEq)]
pub struct IntFilter {
    /// Equals
    pub eq: Option<i32>,
    /// In list
    pub in_list: Option<Vec<i32>>,
}

impl IntFilter {
    /// Check if filter has any conditions
    pub fn is_empty(&self) -> bool {
        self.eq.is_none() && self.in_list.is_none()
    }

    /// Create an equals filter
    pub fn eq(value: i32) -> Self {
        Self {
            eq: Some(value),
            ..Default::default()
        }
    }

    /// Create an in-list filter
    pub fn in_list(values: Vec<i32>) -> Self {
        Self {
            in_list: Some(values),
            ..Default::default()
        }
    }

    /// Render the conditions for `column`, using `?` placeholders.
    ///
    /// An empty in-list matches nothing rather than being dropped.
    pub fn to_sql_conditions(&self, column: &str) -> (Vec<String>, Vec<SqlValue>) {
        let mut conditions = Vec::new();
        let mut values = Vec::new();

        if let Some(v) = self.eq {
            conditions.push(format!("{} = ?", column));
            values.push(SqlValue::from(v));
        }

        if let Some(ref list) = self.in_list {
            if list.is_empty() {
                conditions.push("1 = 0".to_string());
            } else {
                let placeholders = vec!["?"; list.len()].join(", ");
                conditions.push(format!("{} IN ({})", column, placeholders));
                values.extend(list.iter().copied().map(SqlValue::from));
            }
        }

        (conditions, values)
    }
}

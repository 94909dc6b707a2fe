//! Error types surfaced through the GraphQL API

use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Failure outcomes of user operations.
///
/// Unknown ids are not errors: lookups yield `null` and writes against
/// them are no-ops that still succeed.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl ApiError {
    /// Machine-readable code placed under `extensions.code`
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_storage_error_code() {
        let err = ApiError::from(sqlx::Error::PoolClosed);
        assert_matches!(err, ApiError::Storage(sqlx::Error::PoolClosed));
        assert_eq!(err.code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_extension_carries_code() {
        let gql = ApiError::from(sqlx::Error::RowNotFound).extend();
        let ext = gql.extensions.expect("extensions set");
        assert_eq!(
            ext.get("code"),
            Some(&async_graphql::Value::from("STORAGE_ERROR"))
        );
        assert!(gql.message.starts_with("Storage error"));
    }
}

//! Helper functions shared across GraphQL query/mutation modules.

use async_graphql::{Context, ErrorExtensions};

use crate::error::ApiError;
use crate::orm::{RelationLoader, requested_relations};

/// Relations of `E` selected under the field currently being resolved
pub(crate) fn selected_relations<E: RelationLoader>(ctx: &Context<'_>) -> Vec<&'static str> {
    let selection: Vec<_> = ctx.field().selection_set().collect();
    requested_relations::<E>(&selection)
}

/// Convert a storage failure into a GraphQL error with `STORAGE_ERROR` code
pub(crate) fn storage_error(err: sqlx::Error) -> async_graphql::Error {
    ApiError::from(err).extend()
}

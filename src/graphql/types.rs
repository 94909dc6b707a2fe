//! GraphQL input types

use async_graphql::InputObject;

/// Profile fields supplied when creating a user
#[derive(InputObject, Clone, Debug)]
pub struct ProfileInput {
    pub gender: String,
}

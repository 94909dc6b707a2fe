//! GraphQL schema assembly

use async_graphql::extensions::Tracing;
use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::Database;

use super::mutations::UserMutations;
use super::queries::{GreetingQueries, UserQueries};

/// Root query object, exposed as `Query`
#[derive(MergedObject, Default)]
#[graphql(name = "Query")]
pub struct QueryRoot(GreetingQueries, UserQueries);

/// Root mutation object, exposed as `Mutation`
#[derive(MergedObject, Default)]
#[graphql(name = "Mutation")]
pub struct MutationRoot(UserMutations);

/// The GraphQL schema type
pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema with the database handle as resolver context
pub fn build_schema(db: Database) -> AppSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(db)
        .extension(Tracing)
        .finish()
}

/// Export the schema definition language for the API
pub fn schema_sdl() -> String {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .finish()
        .sdl()
}

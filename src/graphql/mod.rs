//! GraphQL API
//!
//! Query and mutation resolvers are split into domain-specific modules
//! under `queries/` and `mutations/`, each a `#[derive(Default)]` struct
//! with an `#[Object]` impl, merged into the `Query` and `Mutation` roots
//! in `schema.rs`.

pub mod helpers;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use schema::{AppSchema, MutationRoot, QueryRoot, build_schema, schema_sdl};

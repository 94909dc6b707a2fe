//! Persisted entities exposed through GraphQL
//!
//! Each entity is both an async-graphql output type and an ORM entity.

pub mod profile;
pub mod user;

pub use profile::*;
pub use user::*;

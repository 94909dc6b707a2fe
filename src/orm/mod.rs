//! ORM layer
//!
//! Traits and helpers that map entity structs onto SQLite tables:
//! - Table metadata and column definitions (schema sync)
//! - Parameterized SELECT/UPDATE/DELETE generation via sqlx
//! - Row decoding (FromSqlRow)
//! - Relation loading driven by the GraphQL selection set
//!
//! Entities implement the traits by hand; repositories in [crate::db]
//! compose them into the `find_one`/`find`/`save`/`update`/`delete`
//! operations the resolvers call.
//!
//! ```rust,ignore
//! use crate::entities::{User, UserWhere};
//! use crate::orm::{EntityQuery, IntFilter};
//!
//! let user = EntityQuery::<User>::new()
//!     .filter(&UserWhere { id: Some(IntFilter::eq(7)) })
//!     .fetch_one(&pool)
//!     .await?;
//! ```

mod builder;
mod filters;
mod traits;

pub use builder::*;
pub use filters::IntFilter;
pub use traits::*;

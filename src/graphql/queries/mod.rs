pub mod greeting;
pub mod users;

pub use greeting::GreetingQueries;
pub use users::UserQueries;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, Object, Result};

    pub(crate) use crate::db::Database;
    pub(crate) use crate::entities::User;
    pub(crate) use crate::graphql::helpers::*;
}

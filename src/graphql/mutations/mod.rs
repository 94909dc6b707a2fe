pub mod users;

pub use users::UserMutations;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ErrorExtensions, Object, Result};

    pub(crate) use crate::db::{Database, UpdateUser};
    pub(crate) use crate::entities::User;
    pub(crate) use crate::error::ApiError;
    pub(crate) use crate::graphql::types::*;
}

use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// Get a user by ID. Unknown IDs resolve to null.
    async fn user(&self, ctx: &Context<'_>, id: i32) -> Result<Option<User>> {
        let db = ctx.data_unchecked::<Database>();
        let relations = selected_relations::<User>(ctx);

        let user = db
            .users()
            .find_one(id, &relations)
            .await
            .map_err(storage_error)?;

        if let Some(ref u) = user {
            tracing::debug!(user = ?u, "Fetched user");
        }

        Ok(user)
    }

    /// Get all users
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let db = ctx.data_unchecked::<Database>();
        let relations = selected_relations::<User>(ctx);

        db.users().find(&relations).await.map_err(storage_error)
    }
}

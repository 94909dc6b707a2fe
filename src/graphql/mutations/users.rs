use super::prelude::*;

#[derive(Default)]
pub struct UserMutations;

#[Object]
impl UserMutations {
    /// Create a user together with its profile
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        first_name: String,
        profile: ProfileInput,
    ) -> Result<User> {
        let db = ctx.data_unchecked::<Database>();

        match db
            .users()
            .create_with_profile(&first_name, &profile.gender)
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = user.id, profile_id = user.profile_id, "Created user");
                Ok(user)
            }
            Err(e) => {
                let err = ApiError::from(e);
                tracing::error!(error = %err, "Failed to create user");
                Err(err.extend())
            }
        }
    }

    /// Update a user's fields. Succeeds even when no user has the ID.
    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: i32,
        first_name: Option<String>,
    ) -> Option<bool> {
        let db = ctx.data_unchecked::<Database>();
        let patch = UpdateUser { first_name };

        match db.users().update(id, &patch).await {
            Ok(0) => {
                tracing::debug!(user_id = id, "Update matched no changes");
                Some(true)
            }
            Ok(_) => {
                tracing::info!(user_id = id, "Updated user");
                Some(true)
            }
            Err(e) => {
                tracing::error!(user_id = id, error = %e, "Failed to update user");
                Some(false)
            }
        }
    }

    /// Delete a user. The user's profile is kept. Succeeds even when no
    /// user has the ID.
    async fn delete_user(&self, ctx: &Context<'_>, id: i32) -> Option<bool> {
        let db = ctx.data_unchecked::<Database>();

        match db.users().delete(id).await {
            Ok(0) => {
                tracing::debug!(user_id = id, "Delete matched no user");
                Some(true)
            }
            Ok(_) => {
                tracing::info!(user_id = id, "Deleted user");
                Some(true)
            }
            Err(e) => {
                tracing::error!(user_id = id, error = %e, "Failed to delete user");
                Some(false)
            }
        }
    }
}

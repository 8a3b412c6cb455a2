use async_graphql::{Context, ErrorExtensions, Object, Result};

use infra::store::BookingStore;

use crate::auth::permissions::require_actor;
use crate::error::AppError;
use crate::gql::types::User;
use crate::services::BookingError;
use crate::state::AppState;

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The authenticated user.
    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        let actor = require_actor(ctx)?;
        let state = ctx.data::<AppState>()?;

        let row = state
            .store
            .get_user(actor.user_id)
            .await
            .map_err(|e| BookingError::from(e).extend())?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()).extend())?;

        Ok(row.into())
    }
}

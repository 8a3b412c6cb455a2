use async_graphql::{Context, Object, Result, ResultExt, ID};

use crate::auth::permissions::require_actor;
use crate::auth::{Actor, Claims};
use crate::gql::common::helpers::parse_id;
use crate::gql::types::{Activity, RegisterVendorInput, Vendor};
use crate::state::AppState;

#[derive(Default)]
pub struct VendorQuery;

#[Object]
impl VendorQuery {
    /// The caller's vendor profile, if they have one.
    async fn my_vendor(&self, ctx: &Context<'_>) -> Result<Option<Vendor>> {
        let actor = require_actor(ctx)?;
        let state = ctx.data::<AppState>()?;

        let row = state.catalog().vendor_for(&actor).await.extend()?;
        Ok(row.map(Vendor::from))
    }

    async fn vendor(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Vendor>> {
        let state = ctx.data::<AppState>()?;
        let vendor_id = parse_id(&id, "vendor")?;

        let row = state.catalog().get_vendor(vendor_id).await.extend()?;
        Ok(row.map(Vendor::from))
    }

    /// Anonymous callers and other users only see bookable activities.
    async fn vendor_activities(&self, ctx: &Context<'_>, vendor_id: ID) -> Result<Vec<Activity>> {
        let state = ctx.data::<AppState>()?;
        let vendor_id = parse_id(&vendor_id, "vendor")?;

        let actor = match ctx.data_opt::<Claims>() {
            Some(claims) => Some(Actor::from_claims(claims).extend()?),
            None => None,
        };

        let rows = state
            .catalog()
            .list_vendor_activities(actor.as_ref(), vendor_id)
            .await
            .extend()?;

        Ok(rows.into_iter().map(Activity::from).collect())
    }
}

#[derive(Default)]
pub struct VendorMutation;

#[Object]
impl VendorMutation {
    /// Create a vendor profile for the caller. The vendor role applies to
    /// tokens issued afterwards.
    async fn register_vendor(
        &self,
        ctx: &Context<'_>,
        input: RegisterVendorInput,
    ) -> Result<Vendor> {
        let actor = require_actor(ctx)?;
        let state = ctx.data::<AppState>()?;

        let row = state
            .catalog()
            .register_vendor(&actor, input.business_name, input.city)
            .await
            .extend()?;

        Ok(row.into())
    }
}

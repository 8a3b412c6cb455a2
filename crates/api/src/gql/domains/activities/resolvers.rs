use async_graphql::{Context, Object, Result, ResultExt, ID};
use chrono::NaiveDate;

use infra::repos::{UpdateActivityAvailability, UpdateActivityCapacity, UpdateActivityDetails};

use crate::auth::permissions::{require_actor, require_role};
use crate::auth::Role;
use crate::gql::common::helpers::parse_id;
use crate::gql::types::{
    Activity, AvailabilityReport, CreateActivityInput, PaginatedResponse, PaginationInput,
    SetActivityAvailabilityInput, UpdateActivityCapacityInput, UpdateActivityDetailsInput,
};
use crate::services::NewActivity;
use crate::state::AppState;

#[derive(Default)]
pub struct ActivityQuery;

#[Object]
impl ActivityQuery {
    async fn activity(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Activity>> {
        let state = ctx.data::<AppState>()?;
        let activity_id = parse_id(&id, "activity")?;

        let row = state.catalog().get_activity(activity_id).await.extend()?;
        Ok(row.map(Activity::from))
    }

    /// Bookable activities, newest first.
    async fn activities(
        &self,
        ctx: &Context<'_>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<Activity>> {
        let state = ctx.data::<AppState>()?;
        let page = pagination.unwrap_or_default().to_limit_offset();

        let (rows, total) = state.catalog().list_bookable(page).await.extend()?;
        let items = rows.into_iter().map(Activity::from).collect();

        Ok(PaginatedResponse::new(items, page, Some(total)))
    }

    async fn availability(
        &self,
        ctx: &Context<'_>,
        activity_id: ID,
        date: NaiveDate,
        time_slot: Option<String>,
    ) -> Result<AvailabilityReport> {
        let state = ctx.data::<AppState>()?;
        let activity_id = parse_id(&activity_id, "activity")?;

        let availability = state
            .bookings()
            .availability(activity_id, date, time_slot.as_deref())
            .await
            .extend()?;

        Ok(availability.into())
    }
}

#[derive(Default)]
pub struct ActivityMutation;

#[Object]
impl ActivityMutation {
    async fn create_activity(
        &self,
        ctx: &Context<'_>,
        input: CreateActivityInput,
    ) -> Result<Activity> {
        let actor = require_role(ctx, Role::Vendor)?;
        let state = ctx.data::<AppState>()?;

        let vendor_id = input
            .vendor_id
            .as_ref()
            .map(|id| parse_id(id, "vendor"))
            .transpose()?;

        let row = state
            .catalog()
            .create_activity(
                &actor,
                NewActivity {
                    vendor_id,
                    title: input.title,
                    description: input.description,
                    city: input.city,
                    price_cents: input.price_cents,
                    currency: input.currency,
                    min_participants: input.min_participants,
                    max_participants: input.max_participants,
                },
            )
            .await
            .extend()?;

        Ok(row.into())
    }

    async fn update_activity_details(
        &self,
        ctx: &Context<'_>,
        input: UpdateActivityDetailsInput,
    ) -> Result<Activity> {
        let actor = require_actor(ctx)?;
        let state = ctx.data::<AppState>()?;
        let activity_id = parse_id(&input.activity_id, "activity")?;

        let row = state
            .catalog()
            .update_details(
                &actor,
                activity_id,
                UpdateActivityDetails {
                    title: input.title,
                    description: input.description,
                    city: input.city,
                    price_cents: input.price_cents,
                },
            )
            .await
            .extend()?;

        Ok(row.into())
    }

    async fn update_activity_capacity(
        &self,
        ctx: &Context<'_>,
        input: UpdateActivityCapacityInput,
    ) -> Result<Activity> {
        let actor = require_actor(ctx)?;
        let state = ctx.data::<AppState>()?;
        let activity_id = parse_id(&input.activity_id, "activity")?;

        let row = state
            .catalog()
            .update_capacity(
                &actor,
                activity_id,
                UpdateActivityCapacity {
                    min_participants: input.min_participants,
                    max_participants: input.max_participants,
                },
            )
            .await
            .extend()?;

        Ok(row.into())
    }

    async fn set_activity_availability(
        &self,
        ctx: &Context<'_>,
        input: SetActivityAvailabilityInput,
    ) -> Result<Activity> {
        let actor = require_actor(ctx)?;
        let state = ctx.data::<AppState>()?;
        let activity_id = parse_id(&input.activity_id, "activity")?;

        let row = state
            .catalog()
            .set_availability(
                &actor,
                activity_id,
                UpdateActivityAvailability {
                    is_active: input.is_active,
                    status: input.status.map(Into::into),
                },
            )
            .await
            .extend()?;

        Ok(row.into())
    }
}

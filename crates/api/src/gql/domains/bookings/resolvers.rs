use async_graphql::{Context, Object, Result, ResultExt, ID};

use infra::models::BookingStatus as StoredStatus;

use crate::auth::permissions::require_actor;
use crate::gql::common::helpers::parse_id;
use crate::gql::subscriptions::publish_booking_event;
use crate::gql::types::{
    Booking, BookingEventType, CancelBookingInput, CreateBookingInput, PaginatedResponse,
    PaginationInput, UpdateBookingStatusInput,
};
use crate::services::BookingRequest;
use crate::state::AppState;

#[derive(Default)]
pub struct BookingQuery;

#[Object]
impl BookingQuery {
    /// Visible to the booking's user, the owning vendor and admins.
    async fn booking(&self, ctx: &Context<'_>, id: ID) -> Result<Booking> {
        let actor = require_actor(ctx)?;
        let state = ctx.data::<AppState>()?;
        let booking_id = parse_id(&id, "booking")?;

        let row = state
            .bookings()
            .get_booking_for(&actor, booking_id)
            .await
            .extend()?;

        Ok(row.into())
    }

    /// The caller's bookings, newest first.
    async fn my_bookings(
        &self,
        ctx: &Context<'_>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<Booking>> {
        let actor = require_actor(ctx)?;
        let state = ctx.data::<AppState>()?;
        let page = pagination.unwrap_or_default().to_limit_offset();

        let (rows, total) = state.bookings().list_for_user(&actor, page).await.extend()?;
        let items = rows.into_iter().map(Booking::from).collect();

        Ok(PaginatedResponse::new(items, page, Some(total)))
    }

    async fn activity_bookings(
        &self,
        ctx: &Context<'_>,
        activity_id: ID,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<Booking>> {
        let actor = require_actor(ctx)?;
        let state = ctx.data::<AppState>()?;
        let activity_id = parse_id(&activity_id, "activity")?;
        let page = pagination.unwrap_or_default().to_limit_offset();

        let (rows, total) = state
            .bookings()
            .list_for_activity(&actor, activity_id, page)
            .await
            .extend()?;
        let items = rows.into_iter().map(Booking::from).collect();

        Ok(PaginatedResponse::new(items, page, Some(total)))
    }
}

#[derive(Default)]
pub struct BookingMutation;

#[Object]
impl BookingMutation {
    async fn create_booking(&self, ctx: &Context<'_>, input: CreateBookingInput) -> Result<Booking> {
        let actor = require_actor(ctx)?;
        let state = ctx.data::<AppState>()?;
        let activity_id = parse_id(&input.activity_id, "activity")?;

        let request = BookingRequest {
            activity_id,
            booking_date: input.booking_date,
            participants_total: input.participants_total,
            time_slot: input.time_slot,
            contact_phone: input.contact_phone,
            special_requests: input.special_requests,
        };

        let row = state
            .bookings()
            .create_booking(actor.user_id, request)
            .await
            .extend()?;

        publish_booking_event(&row, BookingEventType::Created);
        Ok(row.into())
    }

    async fn cancel_booking(&self, ctx: &Context<'_>, input: CancelBookingInput) -> Result<Booking> {
        let actor = require_actor(ctx)?;
        let state = ctx.data::<AppState>()?;
        let booking_id = parse_id(&input.booking_id, "booking")?;

        let row = state
            .bookings()
            .change_status(&actor, booking_id, StoredStatus::Cancelled, input.reason)
            .await
            .extend()?;

        publish_booking_event(&row, BookingEventType::StatusChanged);
        Ok(row.into())
    }

    async fn update_booking_status(
        &self,
        ctx: &Context<'_>,
        input: UpdateBookingStatusInput,
    ) -> Result<Booking> {
        let actor = require_actor(ctx)?;
        let state = ctx.data::<AppState>()?;
        let booking_id = parse_id(&input.booking_id, "booking")?;

        let row = state
            .bookings()
            .change_status(&actor, booking_id, input.status.into(), input.reason)
            .await
            .extend()?;

        publish_booking_event(&row, BookingEventType::StatusChanged);
        Ok(row.into())
    }
}

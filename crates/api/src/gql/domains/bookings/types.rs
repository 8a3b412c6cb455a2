use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, Enum, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use infra::models::BookingRow;

use crate::gql::domains::activities::types::Activity;
use crate::gql::error::{loader_error, GqlError};
use crate::gql::loaders::ActivityLoader;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
#[graphql(remote = "infra::models::BookingStatus")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
    Refunded,
}

/// Display fields copied when the booking was made. Later edits to the
/// activity, vendor or user do not change them.
#[derive(SimpleObject, Clone, Debug)]
pub struct BookingSnapshot {
    pub activity_title: String,
    pub vendor_name: String,
    pub user_name: String,
    pub user_email: String,
    pub unit_price_cents: i32,
    pub total_price_cents: i32,
    pub currency: String,
}

#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct Booking {
    pub id: ID,
    pub activity_id: ID,
    pub user_id: ID,
    pub vendor_id: ID,
    pub booking_date: NaiveDate,
    pub time_slot: Option<String>,
    pub participants_total: i32,
    pub status: BookingStatus,
    pub snapshot: BookingSnapshot,
    pub contact_phone: Option<String>,
    pub special_requests: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id.into(),
            activity_id: row.activity_id.into(),
            user_id: row.user_id.into(),
            vendor_id: row.vendor_id.into(),
            booking_date: row.booking_date,
            time_slot: row.time_slot,
            participants_total: row.participants_total,
            status: row.status.into(),
            snapshot: BookingSnapshot {
                activity_title: row.activity_title,
                vendor_name: row.vendor_name,
                user_name: row.user_name,
                user_email: row.user_email,
                unit_price_cents: row.unit_price_cents,
                total_price_cents: row.total_price_cents,
                currency: row.currency,
            },
            contact_phone: row.contact_phone,
            special_requests: row.special_requests,
            cancelled_at: row.cancelled_at,
            cancellation_reason: row.cancellation_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[ComplexObject]
impl Booking {
    /// The activity as it is now, unlike `snapshot`.
    async fn activity(&self, ctx: &Context<'_>) -> Result<Option<Activity>> {
        let activity_id = Uuid::parse_str(self.activity_id.as_str()).map_err(GqlError::from)?;
        let loader = ctx.data::<DataLoader<ActivityLoader>>()?;

        let row = loader
            .load_one(activity_id)
            .await
            .map_err(loader_error)?;
        Ok(row.map(Activity::from))
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum BookingEventType {
    Created,
    StatusChanged,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct BookingEvent {
    pub event_type: BookingEventType,
    pub booking_id: ID,
    pub activity_id: ID,
    pub booking_date: NaiveDate,
    pub time_slot: Option<String>,
    pub participants_total: i32,
    pub status: BookingStatus,
    pub occurred_at: DateTime<Utc>,
}

impl BookingEvent {
    pub fn from_row(row: &BookingRow, event_type: BookingEventType) -> Self {
        Self {
            event_type,
            booking_id: row.id.into(),
            activity_id: row.activity_id.into(),
            booking_date: row.booking_date,
            time_slot: row.time_slot.clone(),
            participants_total: row.participants_total,
            status: row.status.into(),
            occurred_at: row.updated_at,
        }
    }
}

#[derive(InputObject)]
pub struct CreateBookingInput {
    pub activity_id: ID,
    pub booking_date: NaiveDate,
    pub participants_total: i32,
    pub time_slot: Option<String>,
    pub contact_phone: Option<String>,
    pub special_requests: Option<String>,
}

#[derive(InputObject)]
pub struct CancelBookingInput {
    pub booking_id: ID,
    pub reason: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateBookingStatusInput {
    pub booking_id: ID,
    pub status: BookingStatus,
    pub reason: Option<String>,
}

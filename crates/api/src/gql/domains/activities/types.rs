use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, Enum, InputObject, Result, ResultExt, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use infra::models::ActivityRow;

use crate::gql::domains::vendors::types::Vendor;
use crate::gql::error::{loader_error, GqlError};
use crate::gql::loaders::VendorLoader;
use crate::services::Availability;
use crate::state::AppState;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
#[graphql(remote = "infra::models::ActivityStatus")]
pub enum ActivityStatus {
    Draft,
    Active,
    Suspended,
    Archived,
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Activity {
    pub id: ID,
    #[graphql(skip)]
    pub vendor_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub price_cents: i32,
    pub currency: String,
    pub min_participants: i32,
    pub max_participants: i32,
    pub is_active: bool,
    pub status: ActivityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ActivityRow> for Activity {
    fn from(row: ActivityRow) -> Self {
        Self {
            id: row.id.into(),
            vendor_id: row.vendor_id,
            title: row.title,
            description: row.description,
            city: row.city,
            price_cents: row.price_cents,
            currency: row.currency,
            min_participants: row.min_participants,
            max_participants: row.max_participants,
            is_active: row.is_active,
            status: row.status.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[ComplexObject]
impl Activity {
    async fn vendor(&self, ctx: &Context<'_>) -> Result<Option<Vendor>> {
        let loader = ctx.data::<DataLoader<VendorLoader>>()?;
        let row = loader
            .load_one(self.vendor_id)
            .await
            .map_err(loader_error)?;
        Ok(row.map(Vendor::from))
    }

    /// Places left on a date (and slot, when capacity is tracked per slot).
    async fn availability(
        &self,
        ctx: &Context<'_>,
        date: NaiveDate,
        time_slot: Option<String>,
    ) -> Result<AvailabilityReport> {
        let state = ctx.data::<AppState>()?;
        let id = Uuid::parse_str(self.id.as_str()).map_err(GqlError::from)?;

        let availability = state
            .bookings()
            .availability(id, date, time_slot.as_deref())
            .await
            .extend()?;

        Ok(availability.into())
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct AvailabilityReport {
    pub activity_id: ID,
    pub booking_date: NaiveDate,
    pub time_slot: Option<String>,
    pub capacity: i64,
    pub booked: i64,
    pub remaining: i64,
}

impl From<Availability> for AvailabilityReport {
    fn from(a: Availability) -> Self {
        Self {
            activity_id: a.activity_id.into(),
            booking_date: a.booking_date,
            time_slot: a.time_slot,
            capacity: a.capacity,
            booked: a.booked,
            remaining: a.remaining,
        }
    }
}

#[derive(InputObject)]
pub struct CreateActivityInput {
    /// Admins only; vendors always create for their own profile.
    pub vendor_id: Option<ID>,
    pub title: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub price_cents: i32,
    pub currency: Option<String>,
    #[graphql(default = 1)]
    pub min_participants: i32,
    pub max_participants: i32,
}

#[derive(InputObject)]
pub struct UpdateActivityDetailsInput {
    pub activity_id: ID,
    pub title: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub price_cents: Option<i32>,
}

#[derive(InputObject)]
pub struct UpdateActivityCapacityInput {
    pub activity_id: ID,
    pub min_participants: i32,
    pub max_participants: i32,
}

#[derive(InputObject)]
pub struct SetActivityAvailabilityInput {
    pub activity_id: ID,
    pub is_active: Option<bool>,
    pub status: Option<ActivityStatus>,
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "activity_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Draft,
    Active,
    Suspended,
    Archived,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Draft => "draft",
            ActivityStatus::Active => "active",
            ActivityStatus::Suspended => "suspended",
            ActivityStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
    Refunded,
}

impl BookingStatus {
    /// Statuses whose participants no longer hold capacity.
    pub const RELEASED: [BookingStatus; 2] = [BookingStatus::Cancelled, BookingStatus::Refunded];

    pub fn holds_capacity(&self) -> bool {
        !Self::RELEASED.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
            BookingStatus::NoShow => "no_show",
            BookingStatus::Refunded => "refunded",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct VendorRow {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub business_name: String,
    pub city: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ActivityRow {
    pub id: Uuid,
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

impl ActivityRow {
    /// Both the availability flag and the overall status must allow booking.
    pub fn is_bookable(&self) -> bool {
        self.is_active && self.status == ActivityStatus::Active
    }
}

/// A booking as persisted. The `activity_title`, `vendor_name`, `user_*` and
/// price columns are copied when the booking is written and never refreshed.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRow {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub user_id: Uuid,
    pub vendor_id: Uuid,
    pub booking_date: NaiveDate,
    pub time_slot: Option<String>,
    pub participants_total: i32,
    pub status: BookingStatus,
    pub activity_title: String,
    pub vendor_name: String,
    pub user_name: String,
    pub user_email: String,
    pub unit_price_cents: i32,
    pub total_price_cents: i32,
    pub currency: String,
    pub contact_phone: Option<String>,
    pub special_requests: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

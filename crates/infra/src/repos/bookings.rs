use chrono::NaiveDate;
use sqlx::{PgExecutor, Postgres, QueryBuilder, Result};
use uuid::Uuid;

use crate::models::{BookingRow, BookingStatus};
use crate::pagination::LimitOffset;
use crate::store::{ReservationKey, SlotScope};

const BOOKING_COLUMNS: &str = "id, activity_id, user_id, vendor_id, booking_date, time_slot, \
     participants_total, status, activity_title, vendor_name, user_name, user_email, \
     unit_price_cents, total_price_cents, currency, contact_phone, special_requests, \
     cancelled_at, cancellation_reason, created_at, updated_at";

/// Everything needed to write a booking, snapshot fields included.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub activity_id: Uuid,
    pub user_id: Uuid,
    pub vendor_id: Uuid,
    pub booking_date: NaiveDate,
    pub time_slot: Option<String>,
    pub participants_total: i32,
    pub activity_title: String,
    pub vendor_name: String,
    pub user_name: String,
    pub user_email: String,
    pub unit_price_cents: i32,
    pub total_price_cents: i32,
    pub currency: String,
    pub contact_phone: Option<String>,
    pub special_requests: Option<String>,
}

/// A status update that only applies while the booking is still in `from`.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub from: BookingStatus,
    pub to: BookingStatus,
    pub reason: Option<String>,
}

/// Take the transaction-scoped advisory lock for a reservation key.
/// Must run inside a transaction; the lock is released on commit or rollback.
pub async fn lock_reservation<'e>(executor: impl PgExecutor<'e>, key: &ReservationKey) -> Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(key.lock_name())
        .execute(executor)
        .await?;
    Ok(())
}

/// Sum of participants still holding capacity under `key`.
pub async fn sum_booked_participants<'e>(
    executor: impl PgExecutor<'e>,
    key: &ReservationKey,
) -> Result<i64> {
    let released: Vec<&str> = BookingStatus::RELEASED.iter().map(|s| s.as_str()).collect();

    let mut query = QueryBuilder::<Postgres>::new(
        "SELECT COALESCE(SUM(participants_total), 0)::BIGINT FROM bookings WHERE activity_id = ",
    );
    query.push_bind(key.activity_id);
    query.push(" AND booking_date = ");
    query.push_bind(key.booking_date);
    query.push(" AND NOT (status::text = ANY(");
    query.push_bind(released);
    query.push("))");

    if let SlotScope::Slot(slot) = &key.slot {
        query.push(" AND time_slot IS NOT DISTINCT FROM ");
        query.push_bind(slot.clone());
    }

    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateBooking) -> Result<BookingRow> {
    sqlx::query_as::<_, BookingRow>(&format!(
        r#"
        INSERT INTO bookings (
            activity_id, user_id, vendor_id, booking_date, time_slot, participants_total,
            status, activity_title, vendor_name, user_name, user_email,
            unit_price_cents, total_price_cents, currency, contact_phone, special_requests
        )
        VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(data.activity_id)
    .bind(data.user_id)
    .bind(data.vendor_id)
    .bind(data.booking_date)
    .bind(data.time_slot)
    .bind(data.participants_total)
    .bind(data.activity_title)
    .bind(data.vendor_name)
    .bind(data.user_name)
    .bind(data.user_email)
    .bind(data.unit_price_cents)
    .bind(data.total_price_cents)
    .bind(data.currency)
    .bind(data.contact_phone)
    .bind(data.special_requests)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> Result<Option<BookingRow>> {
    sqlx::query_as::<_, BookingRow>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn list_by_user<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    page: LimitOffset,
) -> Result<Vec<BookingRow>> {
    sqlx::query_as::<_, BookingRow>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(user_id)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(executor)
    .await
}

pub async fn count_by_user<'e>(executor: impl PgExecutor<'e>, user_id: Uuid) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(executor)
        .await
}

pub async fn list_by_activity<'e>(
    executor: impl PgExecutor<'e>,
    activity_id: Uuid,
    page: LimitOffset,
) -> Result<Vec<BookingRow>> {
    sqlx::query_as::<_, BookingRow>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE activity_id = $1
        ORDER BY booking_date ASC, created_at ASC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(activity_id)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(executor)
    .await
}

pub async fn count_by_activity<'e>(executor: impl PgExecutor<'e>, activity_id: Uuid) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE activity_id = $1")
        .bind(activity_id)
        .fetch_one(executor)
        .await
}

/// Compare-and-set on the status column. Returns `None` when the booking is
/// missing or no longer in `change.from`.
pub async fn update_status<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    change: StatusChange,
) -> Result<Option<BookingRow>> {
    let cancelling = change.to == BookingStatus::Cancelled;

    sqlx::query_as::<_, BookingRow>(&format!(
        r#"
        UPDATE bookings
        SET status = $3,
            cancelled_at = CASE WHEN $4 THEN NOW() ELSE cancelled_at END,
            cancellation_reason = CASE WHEN $4 THEN $5 ELSE cancellation_reason END,
            updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(change.from)
    .bind(change.to)
    .bind(cancelling)
    .bind(change.reason)
    .fetch_optional(executor)
    .await
}

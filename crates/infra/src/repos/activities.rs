use sqlx::{PgExecutor, Result};
use uuid::Uuid;

use crate::models::{ActivityRow, ActivityStatus};
use crate::pagination::LimitOffset;

const ACTIVITY_COLUMNS: &str = "id, vendor_id, title, description, city, price_cents, currency, \
     min_participants, max_participants, is_active, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CreateActivity {
    pub vendor_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub price_cents: i32,
    pub currency: String,
    pub min_participants: i32,
    pub max_participants: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateActivityDetails {
    pub title: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub price_cents: Option<i32>,
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateActivityCapacity {
    pub min_participants: i32,
    pub max_participants: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateActivityAvailability {
    pub is_active: Option<bool>,
    pub status: Option<ActivityStatus>,
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateActivity) -> Result<ActivityRow> {
    sqlx::query_as::<_, ActivityRow>(&format!(
        r#"
        INSERT INTO activities (
            vendor_id, title, description, city, price_cents, currency,
            min_participants, max_participants
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {ACTIVITY_COLUMNS}
        "#
    ))
    .bind(data.vendor_id)
    .bind(data.title)
    .bind(data.description)
    .bind(data.city)
    .bind(data.price_cents)
    .bind(data.currency)
    .bind(data.min_participants)
    .bind(data.max_participants)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> Result<Option<ActivityRow>> {
    sqlx::query_as::<_, ActivityRow>(&format!(
        "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn get_many<'e>(executor: impl PgExecutor<'e>, ids: &[Uuid]) -> Result<Vec<ActivityRow>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, ActivityRow>(&format!(
        "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = ANY($1::uuid[])"
    ))
    .bind(ids)
    .fetch_all(executor)
    .await
}

pub async fn list_bookable<'e>(
    executor: impl PgExecutor<'e>,
    page: LimitOffset,
) -> Result<Vec<ActivityRow>> {
    sqlx::query_as::<_, ActivityRow>(&format!(
        r#"
        SELECT {ACTIVITY_COLUMNS}
        FROM activities
        WHERE is_active = TRUE AND status = 'active'
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#
    ))
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(executor)
    .await
}

pub async fn count_bookable<'e>(executor: impl PgExecutor<'e>) -> Result<i64> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM activities WHERE is_active = TRUE AND status = 'active'",
    )
    .fetch_one(executor)
    .await
}

pub async fn list_by_vendor<'e>(
    executor: impl PgExecutor<'e>,
    vendor_id: Uuid,
) -> Result<Vec<ActivityRow>> {
    sqlx::query_as::<_, ActivityRow>(&format!(
        "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE vendor_id = $1 ORDER BY created_at DESC"
    ))
    .bind(vendor_id)
    .fetch_all(executor)
    .await
}

pub async fn update_details<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateActivityDetails,
) -> Result<Option<ActivityRow>> {
    sqlx::query_as::<_, ActivityRow>(&format!(
        r#"
        UPDATE activities
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            city = COALESCE($4, city),
            price_cents = COALESCE($5, price_cents),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {ACTIVITY_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(data.title)
    .bind(data.description)
    .bind(data.city)
    .bind(data.price_cents)
    .fetch_optional(executor)
    .await
}

pub async fn update_capacity<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateActivityCapacity,
) -> Result<Option<ActivityRow>> {
    sqlx::query_as::<_, ActivityRow>(&format!(
        r#"
        UPDATE activities
        SET min_participants = $2, max_participants = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING {ACTIVITY_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(data.min_participants)
    .bind(data.max_participants)
    .fetch_optional(executor)
    .await
}

pub async fn update_availability<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateActivityAvailability,
) -> Result<Option<ActivityRow>> {
    sqlx::query_as::<_, ActivityRow>(&format!(
        r#"
        UPDATE activities
        SET is_active = COALESCE($2, is_active),
            status = COALESCE($3, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {ACTIVITY_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(data.is_active)
    .bind(data.status)
    .fetch_optional(executor)
    .await
}

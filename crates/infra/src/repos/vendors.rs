use sqlx::{PgExecutor, Result};
use uuid::Uuid;

use crate::models::VendorRow;

const VENDOR_COLUMNS: &str =
    "id, owner_user_id, business_name, city, is_verified, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CreateVendor {
    pub owner_user_id: Uuid,
    pub business_name: String,
    pub city: Option<String>,
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateVendor) -> Result<VendorRow> {
    sqlx::query_as::<_, VendorRow>(&format!(
        "INSERT INTO vendors (owner_user_id, business_name, city) \
         VALUES ($1, $2, $3) RETURNING {VENDOR_COLUMNS}"
    ))
    .bind(data.owner_user_id)
    .bind(data.business_name)
    .bind(data.city)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> Result<Option<VendorRow>> {
    sqlx::query_as::<_, VendorRow>(&format!(
        "SELECT {VENDOR_COLUMNS} FROM vendors WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn get_many<'e>(executor: impl PgExecutor<'e>, ids: &[Uuid]) -> Result<Vec<VendorRow>> {
    sqlx::query_as::<_, VendorRow>(&format!(
        "SELECT {VENDOR_COLUMNS} FROM vendors WHERE id = ANY($1::uuid[])"
    ))
    .bind(ids)
    .fetch_all(executor)
    .await
}

pub async fn get_by_owner<'e>(
    executor: impl PgExecutor<'e>,
    owner_user_id: Uuid,
) -> Result<Option<VendorRow>> {
    sqlx::query_as::<_, VendorRow>(&format!(
        "SELECT {VENDOR_COLUMNS} FROM vendors WHERE owner_user_id = $1"
    ))
    .bind(owner_user_id)
    .fetch_optional(executor)
    .await
}

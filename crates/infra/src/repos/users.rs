use sqlx::{PgExecutor, Result};
use uuid::Uuid;

use crate::models::UserRow;

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, phone, role, is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateUser) -> Result<UserRow> {
    sqlx::query_as::<_, UserRow>(&format!(
        "INSERT INTO users (email, first_name, last_name, phone, role) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
    ))
    .bind(data.email)
    .bind(data.first_name)
    .bind(data.last_name)
    .bind(data.phone)
    .bind(data.role)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn update_role<'e>(executor: impl PgExecutor<'e>, id: Uuid, role: &str) -> Result<()> {
    sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(role)
        .execute(executor)
        .await?;
    Ok(())
}

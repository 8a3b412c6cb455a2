use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::routes::{AppPath, AppQuery};
use crate::services::Availability;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub slot: Option<String>,
}

/// `GET /api/activities/{id}/availability?date=YYYY-MM-DD[&slot=...]`
pub async fn availability(
    State(state): State<AppState>,
    AppPath(activity_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<AvailabilityQuery>,
) -> Result<Json<Availability>, AppError> {
    let availability = state
        .bookings()
        .availability(activity_id, query.date, query.slot.as_deref())
        .await?;

    Ok(Json(availability))
}

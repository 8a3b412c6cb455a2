use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use infra::models::BookingRow;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::gql::subscriptions::publish_booking_event;
use crate::gql::types::BookingEventType;
use crate::routes::AppJson;
use crate::services::BookingRequest;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participants {
    pub total: i32,
}

/// Body of `POST /api/bookings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    pub activity_id: Uuid,
    pub booking_date: NaiveDate,
    pub participants: Participants,
    pub time_slot: Option<String>,
    pub contact_phone: Option<String>,
    pub special_requests: Option<String>,
}

/// Admit a booking. 201 with the stored booking, 404 when the activity is
/// missing or inactive, 400 when capacity is insufficient or the body is
/// malformed.
pub async fn create_booking(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    AppJson(body): AppJson<CreateBookingBody>,
) -> Result<(StatusCode, Json<BookingRow>), AppError> {
    let request = BookingRequest {
        activity_id: body.activity_id,
        booking_date: body.booking_date,
        participants_total: body.participants.total,
        time_slot: body.time_slot,
        contact_phone: body.contact_phone,
        special_requests: body.special_requests,
    };

    let booking = state
        .bookings()
        .create_booking(actor.user_id, request)
        .await?;

    publish_booking_event(&booking, BookingEventType::Created);

    Ok((StatusCode::CREATED, Json(booking)))
}

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use infra::models::{BookingRow, BookingStatus};
use infra::pagination::LimitOffset;
use infra::repos::{CreateBooking, StatusChange};
use infra::store::{Admission, BookingStore, ReservationKey, SlotScope};

use crate::auth::Actor;
use crate::config::CapacityGranularity;
use crate::services::status::required_authority;
use crate::services::BookingError;

/// A request to reserve places on an activity for one date.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub activity_id: Uuid,
    pub booking_date: NaiveDate,
    pub participants_total: i32,
    pub time_slot: Option<String>,
    pub contact_phone: Option<String>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub activity_id: Uuid,
    pub booking_date: NaiveDate,
    pub time_slot: Option<String>,
    pub capacity: i64,
    pub booked: i64,
    pub remaining: i64,
}

/// Capacity accounting and admission for bookings.
#[derive(Clone)]
pub struct BookingService<S> {
    store: S,
    granularity: CapacityGranularity,
}

impl<S: BookingStore> BookingService<S> {
    pub fn new(store: S, granularity: CapacityGranularity) -> Self {
        Self { store, granularity }
    }

    /// Map a request onto the pool it draws from under the configured granularity.
    pub fn reservation_key(
        &self,
        activity_id: Uuid,
        booking_date: NaiveDate,
        time_slot: Option<&str>,
    ) -> ReservationKey {
        let slot = match self.granularity {
            CapacityGranularity::Date => SlotScope::AllSlots,
            CapacityGranularity::DateSlot => SlotScope::Slot(normalize_slot(time_slot)),
        };
        ReservationKey::new(activity_id, booking_date, slot)
    }

    /// Participants already holding capacity for the activity on that date.
    /// Cancelled and refunded bookings are not counted.
    pub async fn already_booked(
        &self,
        activity_id: Uuid,
        booking_date: NaiveDate,
        time_slot: Option<&str>,
    ) -> Result<i64, BookingError> {
        let key = self.reservation_key(activity_id, booking_date, time_slot);
        Ok(self.store.booked_participants(&key).await?)
    }

    pub async fn availability(
        &self,
        activity_id: Uuid,
        booking_date: NaiveDate,
        time_slot: Option<&str>,
    ) -> Result<Availability, BookingError> {
        let activity = self
            .store
            .get_activity(activity_id)
            .await?
            .filter(|a| a.is_bookable())
            .ok_or(BookingError::NotFound("activity"))?;

        let booked = self.already_booked(activity_id, booking_date, time_slot).await?;
        let capacity = i64::from(activity.max_participants);

        Ok(Availability {
            activity_id,
            booking_date,
            time_slot: match self.granularity {
                CapacityGranularity::Date => None,
                CapacityGranularity::DateSlot => normalize_slot(time_slot),
            },
            capacity,
            booked,
            remaining: (capacity - booked).max(0),
        })
    }

    /// Admit a booking if the activity is bookable and has room for it.
    ///
    /// Counting and inserting happen inside one [`Admission`], so concurrent
    /// requests for the same pool are serialized and cannot overbook. The
    /// stored booking starts `pending` and carries a snapshot of the
    /// activity, vendor and user display fields taken now.
    pub async fn create_booking(
        &self,
        requester_id: Uuid,
        request: BookingRequest,
    ) -> Result<BookingRow, BookingError> {
        if request.participants_total < 1 {
            return Err(BookingError::invalid(
                "participants total must be at least 1",
            ));
        }

        let time_slot = normalize_slot(request.time_slot.as_deref());
        let key = self.reservation_key(
            request.activity_id,
            request.booking_date,
            time_slot.as_deref(),
        );
        let mut admission = self.store.begin_admission(key).await?;

        let activity = admission
            .find_activity()
            .await?
            .filter(|a| a.is_bookable())
            .ok_or(BookingError::NotFound("activity"))?;

        let booked = admission.booked_participants().await?;
        let capacity = i64::from(activity.max_participants);
        let requested = i64::from(request.participants_total);

        if booked + requested > capacity {
            tracing::warn!(
                lock = %admission.key().lock_name(),
                requested,
                booked,
                capacity,
                "Booking rejected: capacity exceeded"
            );
            return Err(BookingError::CapacityExceeded {
                requested,
                remaining: (capacity - booked).max(0),
            });
        }

        let vendor = admission
            .find_vendor(activity.vendor_id)
            .await?
            .ok_or(BookingError::NotFound("vendor"))?;
        let user = admission
            .find_user(requester_id)
            .await?
            .ok_or(BookingError::NotFound("user"))?;

        let total_price_cents = activity
            .price_cents
            .checked_mul(request.participants_total)
            .ok_or_else(|| BookingError::invalid("total price is out of range"))?;

        let row = admission
            .insert_booking(CreateBooking {
                activity_id: activity.id,
                user_id: user.id,
                vendor_id: vendor.id,
                booking_date: request.booking_date,
                time_slot,
                participants_total: request.participants_total,
                activity_title: activity.title.clone(),
                vendor_name: vendor.business_name.clone(),
                user_name: user.display_name(),
                user_email: user.email.clone(),
                unit_price_cents: activity.price_cents,
                total_price_cents,
                currency: activity.currency.clone(),
                contact_phone: request.contact_phone.or_else(|| user.phone.clone()),
                special_requests: request.special_requests,
            })
            .await?;

        admission.commit().await?;

        tracing::info!(
            booking_id = %row.id,
            activity_id = %row.activity_id,
            booking_date = %row.booking_date,
            participants = row.participants_total,
            remaining = capacity - booked - requested,
            "Booking admitted"
        );

        Ok(row)
    }

    /// Apply a lifecycle transition. Capacity is not re-checked: leaving the
    /// pool (cancel, refund) only ever frees places.
    pub async fn change_status(
        &self,
        actor: &Actor,
        booking_id: Uuid,
        to: BookingStatus,
        reason: Option<String>,
    ) -> Result<BookingRow, BookingError> {
        let booking = self
            .store
            .get_booking(booking_id)
            .await?
            .ok_or(BookingError::NotFound("booking"))?;

        let authority =
            required_authority(booking.status, to).ok_or(BookingError::InvalidTransition {
                from: booking.status,
                to,
            })?;

        let is_owner = booking.user_id == actor.user_id;
        let is_vendor = self.is_vendor_of(actor, booking.vendor_id).await?;
        if !authority.permits(is_owner, is_vendor, actor.is_admin()) {
            return Err(BookingError::Forbidden(format!(
                "You are not allowed to mark this booking as {to}"
            )));
        }

        let change = StatusChange {
            from: booking.status,
            to,
            reason,
        };

        match self.store.update_booking_status(booking_id, change).await? {
            Some(updated) => {
                tracing::info!(
                    booking_id = %booking_id,
                    from = %booking.status,
                    to = %updated.status,
                    actor = %actor.user_id,
                    "Booking status changed"
                );
                Ok(updated)
            }
            // Someone else moved the booking between our read and the update.
            None => {
                let current = self
                    .store
                    .get_booking(booking_id)
                    .await?
                    .ok_or(BookingError::NotFound("booking"))?;
                Err(BookingError::InvalidTransition {
                    from: current.status,
                    to,
                })
            }
        }
    }

    /// A booking is visible to its user, the vendor owning it and admins.
    pub async fn get_booking_for(
        &self,
        actor: &Actor,
        booking_id: Uuid,
    ) -> Result<BookingRow, BookingError> {
        let booking = self
            .store
            .get_booking(booking_id)
            .await?
            .ok_or(BookingError::NotFound("booking"))?;

        if booking.user_id == actor.user_id
            || actor.is_admin()
            || self.is_vendor_of(actor, booking.vendor_id).await?
        {
            Ok(booking)
        } else {
            Err(BookingError::NotFound("booking"))
        }
    }

    /// The caller's bookings, newest first, with their total count.
    pub async fn list_for_user(
        &self,
        actor: &Actor,
        page: LimitOffset,
    ) -> Result<(Vec<BookingRow>, i64), BookingError> {
        let (rows, total) = tokio::try_join!(
            self.store.list_user_bookings(actor.user_id, page),
            self.store.count_user_bookings(actor.user_id)
        )?;
        Ok((rows, total))
    }

    /// An activity's bookings with their total count, for its vendor or an admin.
    pub async fn list_for_activity(
        &self,
        actor: &Actor,
        activity_id: Uuid,
        page: LimitOffset,
    ) -> Result<(Vec<BookingRow>, i64), BookingError> {
        let activity = self
            .store
            .get_activity(activity_id)
            .await?
            .ok_or(BookingError::NotFound("activity"))?;

        if !actor.is_admin() && !self.is_vendor_of(actor, activity.vendor_id).await? {
            return Err(BookingError::Forbidden(
                "Only the activity's vendor can list its bookings".to_string(),
            ));
        }

        let (rows, total) = tokio::try_join!(
            self.store.list_activity_bookings(activity_id, page),
            self.store.count_activity_bookings(activity_id)
        )?;
        Ok((rows, total))
    }

    async fn is_vendor_of(&self, actor: &Actor, vendor_id: Uuid) -> Result<bool, BookingError> {
        Ok(self
            .store
            .get_vendor(vendor_id)
            .await?
            .is_some_and(|v| v.owner_user_id == actor.user_id))
    }
}

/// Blank slot labels are treated as no slot.
fn normalize_slot(slot: Option<&str>) -> Option<String> {
    slot.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

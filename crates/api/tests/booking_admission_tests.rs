mod common;

use api::services::{BookingError, BookingRequest};
use infra::models::{ActivityStatus, BookingStatus};
use infra::repos::{UpdateActivityAvailability, UpdateActivityDetails};
use uuid::Uuid;

use crate::common::*;

fn request(activity_id: Uuid, participants_total: i32) -> BookingRequest {
    BookingRequest {
        activity_id,
        booking_date: date(2025, 6, 1),
        participants_total,
        time_slot: None,
        contact_phone: None,
        special_requests: None,
    }
}

fn slotted(activity_id: Uuid, participants_total: i32, slot: &str) -> BookingRequest {
    BookingRequest {
        time_slot: Some(slot.to_string()),
        ..request(activity_id, participants_total)
    }
}

#[tokio::test]
async fn test_full_capacity_then_rejection_then_release() {
    let fx = fixture(10).await;
    let bookings = fx.app.state.bookings();

    // Scenario 1: empty date, request exactly the capacity
    let first = bookings
        .create_booking(fx.customer.id, request(fx.activity.id, 10))
        .await
        .expect("First booking should be admitted");
    assert_eq!(first.status, BookingStatus::Pending);
    assert_eq!(first.participants_total, 10);

    // Scenario 2: date is full
    let err = bookings
        .create_booking(fx.customer.id, request(fx.activity.id, 1))
        .await
        .expect_err("Full date should reject");
    match err {
        BookingError::CapacityExceeded {
            requested,
            remaining,
        } => {
            assert_eq!(requested, 1);
            assert_eq!(remaining, 0);
        }
        other => panic!("Expected CapacityExceeded, got {other:?}"),
    }

    // Scenario 3: cancelling frees the places again
    bookings
        .change_status(
            &actor(&fx.customer_claims),
            first.id,
            BookingStatus::Cancelled,
            Some("Plans changed".to_string()),
        )
        .await
        .expect("Owner should be able to cancel");

    let again = bookings
        .create_booking(fx.customer.id, request(fx.activity.id, 1))
        .await
        .expect("Released capacity should admit");
    assert_eq!(again.status, BookingStatus::Pending);
}

#[tokio::test]
async fn test_inactive_activity_is_not_found() {
    let fx = fixture(10).await;

    fx.app
        .state
        .catalog()
        .set_availability(
            &actor(&fx.vendor_claims),
            fx.activity.id,
            UpdateActivityAvailability {
                is_active: Some(false),
                status: None,
            },
        )
        .await
        .expect("Vendor should be able to deactivate");

    let err = fx
        .app
        .state
        .bookings()
        .create_booking(fx.customer.id, request(fx.activity.id, 1))
        .await
        .expect_err("Inactive activity should reject");
    assert!(matches!(err, BookingError::NotFound("activity")), "{err:?}");
}

#[tokio::test]
async fn test_non_active_status_is_not_found() {
    let fx = fixture(10).await;

    fx.app
        .state
        .catalog()
        .set_availability(
            &actor(&fx.admin_claims),
            fx.activity.id,
            UpdateActivityAvailability {
                is_active: None,
                status: Some(ActivityStatus::Suspended),
            },
        )
        .await
        .expect("Admin should be able to suspend");

    let err = fx
        .app
        .state
        .bookings()
        .create_booking(fx.customer.id, request(fx.activity.id, 1))
        .await
        .expect_err("Suspended activity should reject");
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_activity_is_not_found() {
    let fx = fixture(10).await;

    let err = fx
        .app
        .state
        .bookings()
        .create_booking(fx.customer.id, request(Uuid::new_v4(), 1))
        .await
        .expect_err("Unknown activity should reject");
    assert!(matches!(err, BookingError::NotFound("activity")));
}

#[tokio::test]
async fn test_participants_must_be_positive() {
    let fx = fixture(10).await;
    let bookings = fx.app.state.bookings();

    for participants in [0, -3] {
        let err = bookings
            .create_booking(fx.customer.id, request(fx.activity.id, participants))
            .await
            .expect_err("Non-positive participants should reject");
        assert!(matches!(err, BookingError::InvalidRequest(_)), "{err:?}");
    }

    let booked = bookings
        .already_booked(fx.activity.id, date(2025, 6, 1), None)
        .await
        .unwrap();
    assert_eq!(booked, 0);
}

#[tokio::test]
async fn test_exact_remaining_succeeds_and_one_more_fails() {
    let fx = fixture(8).await;
    let bookings = fx.app.state.bookings();

    bookings
        .create_booking(fx.customer.id, request(fx.activity.id, 5))
        .await
        .unwrap();

    let err = bookings
        .create_booking(fx.customer.id, request(fx.activity.id, 4))
        .await
        .expect_err("remaining + 1 should reject");
    assert!(matches!(
        err,
        BookingError::CapacityExceeded {
            requested: 4,
            remaining: 3
        }
    ));

    bookings
        .create_booking(fx.customer.id, request(fx.activity.id, 3))
        .await
        .expect("Exactly the remaining places should be admitted");

    let availability = bookings
        .availability(fx.activity.id, date(2025, 6, 1), None)
        .await
        .unwrap();
    assert_eq!(availability.booked, 8);
    assert_eq!(availability.remaining, 0);
}

#[tokio::test]
async fn test_other_dates_do_not_count() {
    let fx = fixture(4).await;
    let bookings = fx.app.state.bookings();

    bookings
        .create_booking(fx.customer.id, request(fx.activity.id, 4))
        .await
        .unwrap();

    let next_day = BookingRequest {
        booking_date: date(2025, 6, 2),
        ..request(fx.activity.id, 4)
    };
    bookings
        .create_booking(fx.customer.id, next_day)
        .await
        .expect("Another date has its own capacity");
}

#[tokio::test]
async fn test_already_booked_is_idempotent() {
    let fx = fixture(20).await;
    let bookings = fx.app.state.bookings();

    bookings
        .create_booking(fx.customer.id, request(fx.activity.id, 3))
        .await
        .unwrap();
    bookings
        .create_booking(fx.customer.id, request(fx.activity.id, 2))
        .await
        .unwrap();

    let first = bookings
        .already_booked(fx.activity.id, date(2025, 6, 1), None)
        .await
        .unwrap();
    let second = bookings
        .already_booked(fx.activity.id, date(2025, 6, 1), None)
        .await
        .unwrap();

    assert_eq!(first, 5);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_refunded_bookings_do_not_hold_capacity() {
    let fx = fixture(6).await;
    let bookings = fx.app.state.bookings();
    let admin = actor(&fx.admin_claims);

    let booking = bookings
        .create_booking(fx.customer.id, request(fx.activity.id, 6))
        .await
        .unwrap();
    bookings
        .change_status(&admin, booking.id, BookingStatus::Cancelled, None)
        .await
        .unwrap();
    bookings
        .change_status(&admin, booking.id, BookingStatus::Refunded, None)
        .await
        .unwrap();

    let booked = bookings
        .already_booked(fx.activity.id, date(2025, 6, 1), None)
        .await
        .unwrap();
    assert_eq!(booked, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_admissions_never_overbook() {
    let fx = fixture(5).await;
    let mut handles = Vec::new();

    for _ in 0..20 {
        let state = fx.app.state.clone();
        let user_id = fx.customer.id;
        let activity_id = fx.activity.id;
        handles.push(tokio::spawn(async move {
            state
                .bookings()
                .create_booking(user_id, request(activity_id, 1))
                .await
        }));
    }

    let mut admitted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.expect("Task panicked") {
            Ok(_) => admitted += 1,
            Err(BookingError::CapacityExceeded { .. }) => rejected += 1,
            Err(other) => panic!("Unexpected error: {other:?}"),
        }
    }

    assert_eq!(admitted, 5);
    assert_eq!(rejected, 15);

    let booked = fx
        .app
        .state
        .bookings()
        .already_booked(fx.activity.id, date(2025, 6, 1), None)
        .await
        .unwrap();
    assert_eq!(booked, 5);
}

#[tokio::test]
async fn test_date_granularity_shares_capacity_across_slots() {
    let fx = fixture_with("date", 4).await;
    let bookings = fx.app.state.bookings();

    bookings
        .create_booking(fx.customer.id, slotted(fx.activity.id, 3, "09:00"))
        .await
        .unwrap();

    let err = bookings
        .create_booking(fx.customer.id, slotted(fx.activity.id, 2, "17:00"))
        .await
        .expect_err("Slots share the date's pool");
    assert!(matches!(
        err,
        BookingError::CapacityExceeded { remaining: 1, .. }
    ));
}

#[tokio::test]
async fn test_slot_granularity_keeps_slots_independent() {
    let fx = fixture_with("date_slot", 4).await;
    let bookings = fx.app.state.bookings();

    bookings
        .create_booking(fx.customer.id, slotted(fx.activity.id, 4, "09:00"))
        .await
        .unwrap();
    bookings
        .create_booking(fx.customer.id, slotted(fx.activity.id, 4, "17:00"))
        .await
        .expect("Another slot has its own pool");

    // No slot at all is a separate pool too
    bookings
        .create_booking(fx.customer.id, request(fx.activity.id, 4))
        .await
        .expect("Unslotted bookings have their own pool");

    let err = bookings
        .create_booking(fx.customer.id, slotted(fx.activity.id, 1, " 09:00 "))
        .await
        .expect_err("Slot labels are trimmed before grouping");
    assert!(matches!(err, BookingError::CapacityExceeded { .. }));

    let availability = bookings
        .availability(fx.activity.id, date(2025, 6, 1), Some("17:00"))
        .await
        .unwrap();
    assert_eq!(availability.time_slot.as_deref(), Some("17:00"));
    assert_eq!(availability.remaining, 0);
}

#[tokio::test]
async fn test_snapshot_is_taken_at_booking_time() {
    let fx = fixture(10).await;
    let booking = fx
        .app
        .state
        .bookings()
        .create_booking(fx.customer.id, request(fx.activity.id, 3))
        .await
        .unwrap();

    assert_eq!(booking.activity_title, "Dune Bashing");
    assert_eq!(booking.vendor_name, "Desert Tours");
    assert_eq!(booking.user_name, "Test User");
    assert_eq!(booking.user_email, "customer@test.com");
    assert_eq!(booking.unit_price_cents, 15_000);
    assert_eq!(booking.total_price_cents, 45_000);
    assert_eq!(booking.currency, "SAR");
    // Falls back to the profile phone when none is given
    assert_eq!(booking.contact_phone.as_deref(), Some("+966500000000"));

    fx.app
        .state
        .catalog()
        .update_details(
            &actor(&fx.vendor_claims),
            fx.activity.id,
            UpdateActivityDetails {
                title: Some("Sunset Dune Bashing".to_string()),
                description: None,
                city: None,
                price_cents: Some(20_000),
            },
        )
        .await
        .unwrap();

    let stored = fx
        .app
        .state
        .bookings()
        .get_booking_for(&actor(&fx.customer_claims), booking.id)
        .await
        .unwrap();
    assert_eq!(stored.activity_title, "Dune Bashing");
    assert_eq!(stored.unit_price_cents, 15_000);
    assert_eq!(stored.total_price_cents, 45_000);
}

#[tokio::test]
async fn test_capacity_reduction_keeps_existing_bookings() {
    let fx = fixture(10).await;
    let bookings = fx.app.state.bookings();

    let booking = bookings
        .create_booking(fx.customer.id, request(fx.activity.id, 8))
        .await
        .unwrap();

    fx.app
        .state
        .catalog()
        .update_capacity(
            &actor(&fx.vendor_claims),
            fx.activity.id,
            infra::repos::UpdateActivityCapacity {
                min_participants: 1,
                max_participants: 5,
            },
        )
        .await
        .unwrap();

    let stored = bookings
        .get_booking_for(&actor(&fx.customer_claims), booking.id)
        .await
        .unwrap();
    assert_eq!(stored.status, BookingStatus::Pending);

    let availability = bookings
        .availability(fx.activity.id, date(2025, 6, 1), None)
        .await
        .unwrap();
    assert_eq!(availability.booked, 8);
    assert_eq!(availability.remaining, 0);

    let err = bookings
        .create_booking(fx.customer.id, request(fx.activity.id, 1))
        .await
        .expect_err("Over-booked date stays closed");
    assert!(matches!(
        err,
        BookingError::CapacityExceeded { remaining: 0, .. }
    ));
}

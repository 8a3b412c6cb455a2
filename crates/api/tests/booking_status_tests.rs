mod common;

use api::auth::Role;
use api::services::status::{required_authority, Authority};
use api::services::{BookingError, BookingRequest};
use infra::models::{BookingRow, BookingStatus};
use infra::pagination::LimitOffset;

use crate::common::*;

async fn book(fx: &Fixture, participants_total: i32) -> BookingRow {
    fx.app
        .state
        .bookings()
        .create_booking(
            fx.customer.id,
            BookingRequest {
                activity_id: fx.activity.id,
                booking_date: date(2025, 7, 14),
                participants_total,
                time_slot: None,
                contact_phone: Some("+966511111111".to_string()),
                special_requests: Some("Vegetarian lunch".to_string()),
            },
        )
        .await
        .expect("Failed to create test booking")
}

#[test]
fn test_lifecycle_table() {
    use BookingStatus::*;

    assert_eq!(
        required_authority(Pending, Confirmed),
        Some(Authority::VendorOrAdmin)
    );
    assert_eq!(
        required_authority(Pending, Cancelled),
        Some(Authority::OwnerVendorOrAdmin)
    );
    assert_eq!(
        required_authority(Confirmed, Cancelled),
        Some(Authority::OwnerVendorOrAdmin)
    );
    assert_eq!(
        required_authority(Confirmed, NoShow),
        Some(Authority::VendorOrAdmin)
    );
    assert_eq!(
        required_authority(Cancelled, Refunded),
        Some(Authority::AdminOnly)
    );

    assert_eq!(required_authority(Pending, Completed), None);
    assert_eq!(required_authority(Cancelled, Confirmed), None);
    assert_eq!(required_authority(Completed, Cancelled), None);
    assert_eq!(required_authority(Refunded, Pending), None);
}

#[tokio::test]
async fn test_vendor_confirms_and_completes() {
    let fx = fixture(10).await;
    let bookings = fx.app.state.bookings();
    let vendor = actor(&fx.vendor_claims);
    let booking = book(&fx, 2).await;

    let confirmed = bookings
        .change_status(&vendor, booking.id, BookingStatus::Confirmed, None)
        .await
        .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    let completed = bookings
        .change_status(&vendor, booking.id, BookingStatus::Completed, None)
        .await
        .unwrap();
    assert_eq!(completed.status, BookingStatus::Completed);

    // Completed bookings still hold their places
    let booked = bookings
        .already_booked(fx.activity.id, date(2025, 7, 14), None)
        .await
        .unwrap();
    assert_eq!(booked, 2);
}

#[tokio::test]
async fn test_customer_cannot_confirm_own_booking() {
    let fx = fixture(10).await;
    let booking = book(&fx, 2).await;

    let err = fx
        .app
        .state
        .bookings()
        .change_status(
            &actor(&fx.customer_claims),
            booking.id,
            BookingStatus::Confirmed,
            None,
        )
        .await
        .expect_err("Customer must not confirm");
    assert!(matches!(err, BookingError::Forbidden(_)), "{err:?}");
}

#[tokio::test]
async fn test_other_vendor_is_forbidden() {
    let fx = fixture(10).await;
    let booking = book(&fx, 2).await;

    // The role says vendor, but this vendor does not own the activity
    let (other_owner, other_claims) =
        create_test_user(&fx.app, "rival@test.com", Role::Vendor);
    create_test_vendor(&fx.app, &other_owner, "Rival Tours").await;

    let err = fx
        .app
        .state
        .bookings()
        .change_status(
            &actor(&other_claims),
            booking.id,
            BookingStatus::Cancelled,
            None,
        )
        .await
        .expect_err("Foreign vendor must not cancel");
    assert_eq!(err.code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_cancel_records_time_and_reason() {
    let fx = fixture(10).await;
    let booking = book(&fx, 4).await;

    let cancelled = fx
        .app
        .state
        .bookings()
        .change_status(
            &actor(&fx.customer_claims),
            booking.id,
            BookingStatus::Cancelled,
            Some("Sandstorm forecast".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());
    assert_eq!(
        cancelled.cancellation_reason.as_deref(),
        Some("Sandstorm forecast")
    );
}

#[tokio::test]
async fn test_invalid_transition_is_rejected() {
    let fx = fixture(10).await;
    let bookings = fx.app.state.bookings();
    let admin = actor(&fx.admin_claims);
    let booking = book(&fx, 1).await;

    let err = bookings
        .change_status(&admin, booking.id, BookingStatus::Completed, None)
        .await
        .expect_err("Pending cannot jump to completed");
    assert!(matches!(
        err,
        BookingError::InvalidTransition {
            from: BookingStatus::Pending,
            to: BookingStatus::Completed
        }
    ));

    bookings
        .change_status(&admin, booking.id, BookingStatus::Cancelled, None)
        .await
        .unwrap();

    // A second cancel reports the current state
    let err = bookings
        .change_status(&admin, booking.id, BookingStatus::Cancelled, None)
        .await
        .expect_err("Cancelled cannot be cancelled again");
    assert_eq!(err.code(), "BAD_REQUEST");
}

#[tokio::test]
async fn test_only_admin_refunds() {
    let fx = fixture(10).await;
    let bookings = fx.app.state.bookings();
    let booking = book(&fx, 1).await;

    bookings
        .change_status(
            &actor(&fx.customer_claims),
            booking.id,
            BookingStatus::Cancelled,
            None,
        )
        .await
        .unwrap();

    let err = bookings
        .change_status(
            &actor(&fx.vendor_claims),
            booking.id,
            BookingStatus::Refunded,
            None,
        )
        .await
        .expect_err("Vendor must not refund");
    assert!(matches!(err, BookingError::Forbidden(_)));

    let refunded = bookings
        .change_status(
            &actor(&fx.admin_claims),
            booking.id,
            BookingStatus::Refunded,
            None,
        )
        .await
        .unwrap();
    assert_eq!(refunded.status, BookingStatus::Refunded);
}

#[tokio::test]
async fn test_unknown_booking_is_not_found() {
    let fx = fixture(10).await;

    let err = fx
        .app
        .state
        .bookings()
        .change_status(
            &actor(&fx.admin_claims),
            uuid::Uuid::new_v4(),
            BookingStatus::Cancelled,
            None,
        )
        .await
        .expect_err("Unknown booking");
    assert!(matches!(err, BookingError::NotFound("booking")));
}

#[tokio::test]
async fn test_booking_visibility() {
    let fx = fixture(10).await;
    let bookings = fx.app.state.bookings();
    let booking = book(&fx, 2).await;

    for claims in [&fx.customer_claims, &fx.vendor_claims, &fx.admin_claims] {
        let found = bookings
            .get_booking_for(&actor(claims), booking.id)
            .await
            .expect("Should be visible");
        assert_eq!(found.id, booking.id);
    }

    let (_, stranger) = create_test_user(&fx.app, "stranger@test.com", Role::User);
    let err = bookings
        .get_booking_for(&actor(&stranger), booking.id)
        .await
        .expect_err("Strangers must not see the booking");
    assert!(matches!(err, BookingError::NotFound("booking")));
}

#[tokio::test]
async fn test_listing_bookings() {
    let fx = fixture(10).await;
    let bookings = fx.app.state.bookings();
    let first = book(&fx, 1).await;
    let second = book(&fx, 2).await;

    let (mine, total) = bookings
        .list_for_user(&actor(&fx.customer_claims), LimitOffset::default())
        .await
        .unwrap();
    let ids: Vec<_> = mine.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![second.id, first.id], "Newest first");
    assert_eq!(total, 2);

    let (page, total) = bookings
        .list_for_user(&actor(&fx.customer_claims), LimitOffset::new(Some(1), Some(1)))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, first.id);
    assert_eq!(total, 2, "Total ignores the page window");

    let (for_vendor, total) = bookings
        .list_for_activity(
            &actor(&fx.vendor_claims),
            fx.activity.id,
            LimitOffset::default(),
        )
        .await
        .unwrap();
    assert_eq!(for_vendor.len(), 2);
    assert_eq!(total, 2);

    let err = bookings
        .list_for_activity(
            &actor(&fx.customer_claims),
            fx.activity.id,
            LimitOffset::default(),
        )
        .await
        .expect_err("Customers cannot list an activity's bookings");
    assert!(matches!(err, BookingError::Forbidden(_)));
}

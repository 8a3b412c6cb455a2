use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use sqlx::Result;
use uuid::Uuid;

use super::locks::{KeyGuard, KeyLocks};
use super::{Admission, BookingStore, ReservationKey};
use crate::models::{ActivityRow, ActivityStatus, BookingRow, BookingStatus, UserRow, VendorRow};
use crate::pagination::LimitOffset;
use crate::repos::{
    CreateActivity, CreateBooking, CreateUser, CreateVendor, StatusChange,
    UpdateActivityAvailability, UpdateActivityCapacity, UpdateActivityDetails,
};

/// Rows are kept in insertion order; listings derive their ordering from it.
#[derive(Default)]
struct Tables {
    users: Vec<UserRow>,
    vendors: Vec<VendorRow>,
    activities: Vec<ActivityRow>,
    bookings: Vec<BookingRow>,
}

impl Tables {
    fn booked(&self, key: &ReservationKey) -> i64 {
        self.bookings
            .iter()
            .filter(|b| key.covers(b) && b.status.holds_capacity())
            .map(|b| i64::from(b.participants_total))
            .sum()
    }

    fn activity_mut(&mut self, id: Uuid) -> Option<&mut ActivityRow> {
        self.activities.iter_mut().find(|a| a.id == id)
    }
}

/// Process-local store used by tests and local runs without Postgres.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    locks: KeyLocks,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Users come from the identity provider in production; this seeds them.
    pub fn insert_user(&self, data: CreateUser) -> UserRow {
        let now = Utc::now();
        let row = UserRow {
            id: Uuid::new_v4(),
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
            phone: data.phone,
            role: data.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().users.push(row.clone());
        row
    }

    /// Reservation keys that currently have an admission open or waiting.
    pub fn locked_keys(&self) -> usize {
        self.locks.len()
    }
}

impl BookingStore for MemoryStore {
    type Admission = MemoryAdmission;

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        Ok(self.tables.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn set_user_role(&self, id: Uuid, role: &str) -> Result<()> {
        let mut tables = self.tables.lock();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
            user.role = role.to_string();
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn create_vendor(&self, data: CreateVendor) -> Result<VendorRow> {
        let now = Utc::now();
        let row = VendorRow {
            id: Uuid::new_v4(),
            owner_user_id: data.owner_user_id,
            business_name: data.business_name,
            city: data.city,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().vendors.push(row.clone());
        Ok(row)
    }

    async fn get_vendor(&self, id: Uuid) -> Result<Option<VendorRow>> {
        Ok(self.tables.lock().vendors.iter().find(|v| v.id == id).cloned())
    }

    async fn get_vendors(&self, ids: &[Uuid]) -> Result<Vec<VendorRow>> {
        Ok(self
            .tables
            .lock()
            .vendors
            .iter()
            .filter(|v| ids.contains(&v.id))
            .cloned()
            .collect())
    }

    async fn get_vendor_by_owner(&self, owner_user_id: Uuid) -> Result<Option<VendorRow>> {
        Ok(self
            .tables
            .lock()
            .vendors
            .iter()
            .find(|v| v.owner_user_id == owner_user_id)
            .cloned())
    }

    async fn create_activity(&self, data: CreateActivity) -> Result<ActivityRow> {
        let now = Utc::now();
        let row = ActivityRow {
            id: Uuid::new_v4(),
            vendor_id: data.vendor_id,
            title: data.title,
            description: data.description,
            city: data.city,
            price_cents: data.price_cents,
            currency: data.currency,
            min_participants: data.min_participants,
            max_participants: data.max_participants,
            is_active: true,
            status: ActivityStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().activities.push(row.clone());
        Ok(row)
    }

    async fn get_activity(&self, id: Uuid) -> Result<Option<ActivityRow>> {
        Ok(self.tables.lock().activities.iter().find(|a| a.id == id).cloned())
    }

    async fn get_activities(&self, ids: &[Uuid]) -> Result<Vec<ActivityRow>> {
        Ok(self
            .tables
            .lock()
            .activities
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn list_bookable_activities(&self, page: LimitOffset) -> Result<Vec<ActivityRow>> {
        let bookable: Vec<ActivityRow> = self
            .tables
            .lock()
            .activities
            .iter()
            .rev()
            .filter(|a| a.is_bookable())
            .cloned()
            .collect();
        Ok(page.window(&bookable))
    }

    async fn count_bookable_activities(&self) -> Result<i64> {
        let tables = self.tables.lock();
        Ok(tables.activities.iter().filter(|a| a.is_bookable()).count() as i64)
    }

    async fn list_vendor_activities(&self, vendor_id: Uuid) -> Result<Vec<ActivityRow>> {
        Ok(self
            .tables
            .lock()
            .activities
            .iter()
            .rev()
            .filter(|a| a.vendor_id == vendor_id)
            .cloned()
            .collect())
    }

    async fn update_activity_details(
        &self,
        id: Uuid,
        data: UpdateActivityDetails,
    ) -> Result<Option<ActivityRow>> {
        let mut tables = self.tables.lock();
        Ok(tables.activity_mut(id).map(|activity| {
            if let Some(title) = data.title {
                activity.title = title;
            }
            if data.description.is_some() {
                activity.description = data.description;
            }
            if data.city.is_some() {
                activity.city = data.city;
            }
            if let Some(price_cents) = data.price_cents {
                activity.price_cents = price_cents;
            }
            activity.updated_at = Utc::now();
            activity.clone()
        }))
    }

    async fn update_activity_capacity(
        &self,
        id: Uuid,
        data: UpdateActivityCapacity,
    ) -> Result<Option<ActivityRow>> {
        let mut tables = self.tables.lock();
        Ok(tables.activity_mut(id).map(|activity| {
            activity.min_participants = data.min_participants;
            activity.max_participants = data.max_participants;
            activity.updated_at = Utc::now();
            activity.clone()
        }))
    }

    async fn update_activity_availability(
        &self,
        id: Uuid,
        data: UpdateActivityAvailability,
    ) -> Result<Option<ActivityRow>> {
        let mut tables = self.tables.lock();
        Ok(tables.activity_mut(id).map(|activity| {
            if let Some(is_active) = data.is_active {
                activity.is_active = is_active;
            }
            if let Some(status) = data.status {
                activity.status = status;
            }
            activity.updated_at = Utc::now();
            activity.clone()
        }))
    }

    async fn booked_participants(&self, key: &ReservationKey) -> Result<i64> {
        Ok(self.tables.lock().booked(key))
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<BookingRow>> {
        Ok(self.tables.lock().bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list_user_bookings(&self, user_id: Uuid, page: LimitOffset) -> Result<Vec<BookingRow>> {
        let rows: Vec<BookingRow> = self
            .tables
            .lock()
            .bookings
            .iter()
            .rev()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        Ok(page.window(&rows))
    }

    async fn count_user_bookings(&self, user_id: Uuid) -> Result<i64> {
        let tables = self.tables.lock();
        Ok(tables.bookings.iter().filter(|b| b.user_id == user_id).count() as i64)
    }

    async fn count_activity_bookings(&self, activity_id: Uuid) -> Result<i64> {
        let tables = self.tables.lock();
        Ok(tables
            .bookings
            .iter()
            .filter(|b| b.activity_id == activity_id)
            .count() as i64)
    }

    async fn list_activity_bookings(
        &self,
        activity_id: Uuid,
        page: LimitOffset,
    ) -> Result<Vec<BookingRow>> {
        let mut rows: Vec<BookingRow> = self
            .tables
            .lock()
            .bookings
            .iter()
            .filter(|b| b.activity_id == activity_id)
            .cloned()
            .collect();
        rows.sort_by_key(|b| b.booking_date);
        Ok(page.window(&rows))
    }

    async fn update_booking_status(
        &self,
        id: Uuid,
        change: StatusChange,
    ) -> Result<Option<BookingRow>> {
        let mut tables = self.tables.lock();
        let Some(booking) = tables
            .bookings
            .iter_mut()
            .find(|b| b.id == id && b.status == change.from)
        else {
            return Ok(None);
        };

        let now = Utc::now();
        booking.status = change.to;
        if change.to == BookingStatus::Cancelled {
            booking.cancelled_at = Some(now);
            booking.cancellation_reason = change.reason;
        }
        booking.updated_at = now;
        Ok(Some(booking.clone()))
    }

    async fn begin_admission(&self, key: ReservationKey) -> Result<MemoryAdmission> {
        let guard = self.locks.acquire(&key).await;
        Ok(MemoryAdmission {
            store: self.clone(),
            key,
            pending: Vec::new(),
            _guard: guard,
        })
    }
}

/// Holds the per-key async mutex; inserts become visible on commit.
pub struct MemoryAdmission {
    store: MemoryStore,
    key: ReservationKey,
    pending: Vec<BookingRow>,
    _guard: KeyGuard,
}

impl Admission for MemoryAdmission {
    fn key(&self) -> &ReservationKey {
        &self.key
    }

    async fn find_activity(&mut self) -> Result<Option<ActivityRow>> {
        self.store.get_activity(self.key.activity_id).await
    }

    async fn find_vendor(&mut self, id: Uuid) -> Result<Option<VendorRow>> {
        self.store.get_vendor(id).await
    }

    async fn find_user(&mut self, id: Uuid) -> Result<Option<UserRow>> {
        self.store.get_user(id).await
    }

    async fn booked_participants(&mut self) -> Result<i64> {
        let committed = self.store.tables.lock().booked(&self.key);
        let pending: i64 = self
            .pending
            .iter()
            .map(|b| i64::from(b.participants_total))
            .sum();
        Ok(committed + pending)
    }

    async fn insert_booking(&mut self, data: CreateBooking) -> Result<BookingRow> {
        let now = Utc::now();
        let row = BookingRow {
            id: Uuid::new_v4(),
            activity_id: data.activity_id,
            user_id: data.user_id,
            vendor_id: data.vendor_id,
            booking_date: data.booking_date,
            time_slot: data.time_slot,
            participants_total: data.participants_total,
            status: BookingStatus::Pending,
            activity_title: data.activity_title,
            vendor_name: data.vendor_name,
            user_name: data.user_name,
            user_email: data.user_email,
            unit_price_cents: data.unit_price_cents,
            total_price_cents: data.total_price_cents,
            currency: data.currency,
            contact_phone: data.contact_phone,
            special_requests: data.special_requests,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };
        self.pending.push(row.clone());
        Ok(row)
    }

    async fn commit(self) -> Result<()> {
        tracing::debug!(lock = %self.key.lock_name(), inserted = self.pending.len(), "Admission committed");
        self.store.tables.lock().bookings.extend(self.pending);
        Ok(())
    }
}

use sqlx::{Postgres, Result, Transaction};
use uuid::Uuid;

use super::locks::{KeyGuard, KeyLocks};
use super::{Admission, BookingStore, ReservationKey};
use crate::db::Db;
use crate::models::{ActivityRow, BookingRow, UserRow, VendorRow};
use crate::pagination::LimitOffset;
use crate::repos::{
    activities, bookings, users, vendors, CreateActivity, CreateBooking, CreateVendor,
    StatusChange, UpdateActivityAvailability, UpdateActivityCapacity, UpdateActivityDetails,
};

#[derive(Clone)]
pub struct PgStore {
    db: Db,
    locks: KeyLocks,
}

impl PgStore {
    pub fn new(db: Db) -> Self {
        Self {
            db,
            locks: KeyLocks::default(),
        }
    }

    pub fn pool(&self) -> &Db {
        &self.db
    }
}

impl BookingStore for PgStore {
    type Admission = PgAdmission;

    async fn ping(&self) -> Result<()> {
        let _one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.db).await?;
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        users::get_by_id(&self.db, id).await
    }

    async fn set_user_role(&self, id: Uuid, role: &str) -> Result<()> {
        users::update_role(&self.db, id, role).await
    }

    async fn create_vendor(&self, data: CreateVendor) -> Result<VendorRow> {
        vendors::create(&self.db, data).await
    }

    async fn get_vendor(&self, id: Uuid) -> Result<Option<VendorRow>> {
        vendors::get_by_id(&self.db, id).await
    }

    async fn get_vendors(&self, ids: &[Uuid]) -> Result<Vec<VendorRow>> {
        vendors::get_many(&self.db, ids).await
    }

    async fn get_vendor_by_owner(&self, owner_user_id: Uuid) -> Result<Option<VendorRow>> {
        vendors::get_by_owner(&self.db, owner_user_id).await
    }

    async fn create_activity(&self, data: CreateActivity) -> Result<ActivityRow> {
        activities::create(&self.db, data).await
    }

    async fn get_activity(&self, id: Uuid) -> Result<Option<ActivityRow>> {
        activities::get_by_id(&self.db, id).await
    }

    async fn get_activities(&self, ids: &[Uuid]) -> Result<Vec<ActivityRow>> {
        activities::get_many(&self.db, ids).await
    }

    async fn list_bookable_activities(&self, page: LimitOffset) -> Result<Vec<ActivityRow>> {
        activities::list_bookable(&self.db, page).await
    }

    async fn count_bookable_activities(&self) -> Result<i64> {
        activities::count_bookable(&self.db).await
    }

    async fn list_vendor_activities(&self, vendor_id: Uuid) -> Result<Vec<ActivityRow>> {
        activities::list_by_vendor(&self.db, vendor_id).await
    }

    async fn update_activity_details(
        &self,
        id: Uuid,
        data: UpdateActivityDetails,
    ) -> Result<Option<ActivityRow>> {
        activities::update_details(&self.db, id, data).await
    }

    async fn update_activity_capacity(
        &self,
        id: Uuid,
        data: UpdateActivityCapacity,
    ) -> Result<Option<ActivityRow>> {
        activities::update_capacity(&self.db, id, data).await
    }

    async fn update_activity_availability(
        &self,
        id: Uuid,
        data: UpdateActivityAvailability,
    ) -> Result<Option<ActivityRow>> {
        activities::update_availability(&self.db, id, data).await
    }

    async fn booked_participants(&self, key: &ReservationKey) -> Result<i64> {
        bookings::sum_booked_participants(&self.db, key).await
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<BookingRow>> {
        bookings::get_by_id(&self.db, id).await
    }

    async fn list_user_bookings(&self, user_id: Uuid, page: LimitOffset) -> Result<Vec<BookingRow>> {
        bookings::list_by_user(&self.db, user_id, page).await
    }

    async fn list_activity_bookings(
        &self,
        activity_id: Uuid,
        page: LimitOffset,
    ) -> Result<Vec<BookingRow>> {
        bookings::list_by_activity(&self.db, activity_id, page).await
    }

    async fn count_user_bookings(&self, user_id: Uuid) -> Result<i64> {
        bookings::count_by_user(&self.db, user_id).await
    }

    async fn count_activity_bookings(&self, activity_id: Uuid) -> Result<i64> {
        bookings::count_by_activity(&self.db, activity_id).await
    }

    async fn update_booking_status(
        &self,
        id: Uuid,
        change: StatusChange,
    ) -> Result<Option<BookingRow>> {
        bookings::update_status(&self.db, id, change).await
    }

    /// Same-process admissions queue on the in-process key lock before
    /// taking a pooled connection, so a burst on one hot key holds at most
    /// one connection per server. The advisory lock then serializes
    /// admissions across servers.
    async fn begin_admission(&self, key: ReservationKey) -> Result<PgAdmission> {
        let local = self.locks.acquire(&key).await;
        let mut tx = self.db.begin().await?;
        bookings::lock_reservation(&mut *tx, &key).await?;
        tracing::debug!(lock = %key.lock_name(), "Reservation lock acquired");
        Ok(PgAdmission {
            tx,
            key,
            _local: local,
        })
    }
}

/// Admission backed by a transaction holding `pg_advisory_xact_lock` for the key.
pub struct PgAdmission {
    tx: Transaction<'static, Postgres>,
    key: ReservationKey,
    _local: KeyGuard,
}

impl Admission for PgAdmission {
    fn key(&self) -> &ReservationKey {
        &self.key
    }

    async fn find_activity(&mut self) -> Result<Option<ActivityRow>> {
        activities::get_by_id(&mut *self.tx, self.key.activity_id).await
    }

    async fn find_vendor(&mut self, id: Uuid) -> Result<Option<VendorRow>> {
        vendors::get_by_id(&mut *self.tx, id).await
    }

    async fn find_user(&mut self, id: Uuid) -> Result<Option<UserRow>> {
        users::get_by_id(&mut *self.tx, id).await
    }

    async fn booked_participants(&mut self) -> Result<i64> {
        bookings::sum_booked_participants(&mut *self.tx, &self.key).await
    }

    async fn insert_booking(&mut self, data: CreateBooking) -> Result<BookingRow> {
        bookings::create(&mut *self.tx, data).await
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await
    }
}

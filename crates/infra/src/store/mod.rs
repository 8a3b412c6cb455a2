//! Storage seam for the booking core.
//!
//! [`BookingStore`] covers the reads and single-row writes the service needs;
//! [`Admission`] is a unit of work that holds the reservation lock for one
//! [`ReservationKey`] from the capacity count until the insert is committed.

mod locks;
mod memory;
mod postgres;

use std::future::Future;

use chrono::NaiveDate;
use sqlx::Result;
use uuid::Uuid;

use crate::models::{ActivityRow, BookingRow, UserRow, VendorRow};
use crate::pagination::LimitOffset;
use crate::repos::{
    CreateActivity, CreateBooking, CreateVendor, StatusChange, UpdateActivityAvailability,
    UpdateActivityCapacity, UpdateActivityDetails,
};

pub use memory::{MemoryAdmission, MemoryStore};
pub use postgres::{PgAdmission, PgStore};

/// Which bookings on a date share a capacity pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotScope {
    /// Every booking on the date counts, whatever its time slot.
    AllSlots,
    /// Only bookings with exactly this slot count (`None` is its own pool).
    Slot(Option<String>),
}

/// The unit capacity is enforced against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReservationKey {
    pub activity_id: Uuid,
    pub booking_date: NaiveDate,
    pub slot: SlotScope,
}

impl ReservationKey {
    pub fn new(activity_id: Uuid, booking_date: NaiveDate, slot: SlotScope) -> Self {
        Self {
            activity_id,
            booking_date,
            slot,
        }
    }

    /// Stable text form, hashed into the Postgres advisory lock id.
    pub fn lock_name(&self) -> String {
        match &self.slot {
            SlotScope::AllSlots => format!("booking:{}:{}:*", self.activity_id, self.booking_date),
            SlotScope::Slot(None) => format!("booking:{}:{}:-", self.activity_id, self.booking_date),
            SlotScope::Slot(Some(slot)) => format!(
                "booking:{}:{}:={}",
                self.activity_id, self.booking_date, slot
            ),
        }
    }

    /// Whether `booking` draws from this key's pool, ignoring its status.
    pub fn covers(&self, booking: &BookingRow) -> bool {
        if booking.activity_id != self.activity_id || booking.booking_date != self.booking_date {
            return false;
        }
        match &self.slot {
            SlotScope::AllSlots => true,
            SlotScope::Slot(slot) => booking.time_slot == *slot,
        }
    }
}

pub trait BookingStore: Clone + Send + Sync + 'static {
    type Admission: Admission;

    fn ping(&self) -> impl Future<Output = Result<()>> + Send;

    fn get_user(&self, id: Uuid) -> impl Future<Output = Result<Option<UserRow>>> + Send;

    fn set_user_role(&self, id: Uuid, role: &str) -> impl Future<Output = Result<()>> + Send;

    fn create_vendor(&self, data: CreateVendor) -> impl Future<Output = Result<VendorRow>> + Send;

    fn get_vendor(&self, id: Uuid) -> impl Future<Output = Result<Option<VendorRow>>> + Send;

    fn get_vendors(&self, ids: &[Uuid]) -> impl Future<Output = Result<Vec<VendorRow>>> + Send;

    fn get_vendor_by_owner(
        &self,
        owner_user_id: Uuid,
    ) -> impl Future<Output = Result<Option<VendorRow>>> + Send;

    fn create_activity(
        &self,
        data: CreateActivity,
    ) -> impl Future<Output = Result<ActivityRow>> + Send;

    fn get_activity(&self, id: Uuid) -> impl Future<Output = Result<Option<ActivityRow>>> + Send;

    fn get_activities(&self, ids: &[Uuid])
        -> impl Future<Output = Result<Vec<ActivityRow>>> + Send;

    fn list_bookable_activities(
        &self,
        page: LimitOffset,
    ) -> impl Future<Output = Result<Vec<ActivityRow>>> + Send;

    fn count_bookable_activities(&self) -> impl Future<Output = Result<i64>> + Send;

    fn list_vendor_activities(
        &self,
        vendor_id: Uuid,
    ) -> impl Future<Output = Result<Vec<ActivityRow>>> + Send;

    fn update_activity_details(
        &self,
        id: Uuid,
        data: UpdateActivityDetails,
    ) -> impl Future<Output = Result<Option<ActivityRow>>> + Send;

    fn update_activity_capacity(
        &self,
        id: Uuid,
        data: UpdateActivityCapacity,
    ) -> impl Future<Output = Result<Option<ActivityRow>>> + Send;

    fn update_activity_availability(
        &self,
        id: Uuid,
        data: UpdateActivityAvailability,
    ) -> impl Future<Output = Result<Option<ActivityRow>>> + Send;

    /// Participants currently holding capacity under `key`, read without locking.
    fn booked_participants(&self, key: &ReservationKey)
        -> impl Future<Output = Result<i64>> + Send;

    fn get_booking(&self, id: Uuid) -> impl Future<Output = Result<Option<BookingRow>>> + Send;

    fn list_user_bookings(
        &self,
        user_id: Uuid,
        page: LimitOffset,
    ) -> impl Future<Output = Result<Vec<BookingRow>>> + Send;

    fn count_user_bookings(&self, user_id: Uuid) -> impl Future<Output = Result<i64>> + Send;

    fn list_activity_bookings(
        &self,
        activity_id: Uuid,
        page: LimitOffset,
    ) -> impl Future<Output = Result<Vec<BookingRow>>> + Send;

    fn count_activity_bookings(&self, activity_id: Uuid)
        -> impl Future<Output = Result<i64>> + Send;

    fn update_booking_status(
        &self,
        id: Uuid,
        change: StatusChange,
    ) -> impl Future<Output = Result<Option<BookingRow>>> + Send;

    /// Open an admission for `key`. Resolves once no other admission for the
    /// same key is in flight.
    fn begin_admission(
        &self,
        key: ReservationKey,
    ) -> impl Future<Output = Result<Self::Admission>> + Send;
}

/// Serialized count-and-insert for one reservation key. Dropping it without
/// calling [`Admission::commit`] discards the insert.
pub trait Admission: Send {
    fn key(&self) -> &ReservationKey;

    fn find_activity(&mut self) -> impl Future<Output = Result<Option<ActivityRow>>> + Send;

    fn find_vendor(&mut self, id: Uuid) -> impl Future<Output = Result<Option<VendorRow>>> + Send;

    fn find_user(&mut self, id: Uuid) -> impl Future<Output = Result<Option<UserRow>>> + Send;

    fn booked_participants(&mut self) -> impl Future<Output = Result<i64>> + Send;

    fn insert_booking(
        &mut self,
        data: CreateBooking,
    ) -> impl Future<Output = Result<BookingRow>> + Send;

    fn commit(self) -> impl Future<Output = Result<()>> + Send;
}

/// Runtime-selected backend, so application state stays a concrete type.
#[derive(Clone)]
pub enum Store {
    Postgres(PgStore),
    Memory(MemoryStore),
}

pub enum StoreAdmission {
    Postgres(PgAdmission),
    Memory(MemoryAdmission),
}

macro_rules! dispatch {
    ($target:expr, $enum:ident, $inner:ident => $call:expr) => {
        match $target {
            $enum::Postgres($inner) => $call.await,
            $enum::Memory($inner) => $call.await,
        }
    };
}

impl BookingStore for Store {
    type Admission = StoreAdmission;

    async fn ping(&self) -> Result<()> {
        dispatch!(self, Store, s => s.ping())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        dispatch!(self, Store, s => s.get_user(id))
    }

    async fn set_user_role(&self, id: Uuid, role: &str) -> Result<()> {
        dispatch!(self, Store, s => s.set_user_role(id, role))
    }

    async fn create_vendor(&self, data: CreateVendor) -> Result<VendorRow> {
        dispatch!(self, Store, s => s.create_vendor(data))
    }

    async fn get_vendor(&self, id: Uuid) -> Result<Option<VendorRow>> {
        dispatch!(self, Store, s => s.get_vendor(id))
    }

    async fn get_vendors(&self, ids: &[Uuid]) -> Result<Vec<VendorRow>> {
        dispatch!(self, Store, s => s.get_vendors(ids))
    }

    async fn get_vendor_by_owner(&self, owner_user_id: Uuid) -> Result<Option<VendorRow>> {
        dispatch!(self, Store, s => s.get_vendor_by_owner(owner_user_id))
    }

    async fn create_activity(&self, data: CreateActivity) -> Result<ActivityRow> {
        dispatch!(self, Store, s => s.create_activity(data))
    }

    async fn get_activity(&self, id: Uuid) -> Result<Option<ActivityRow>> {
        dispatch!(self, Store, s => s.get_activity(id))
    }

    async fn get_activities(&self, ids: &[Uuid]) -> Result<Vec<ActivityRow>> {
        dispatch!(self, Store, s => s.get_activities(ids))
    }

    async fn list_bookable_activities(&self, page: LimitOffset) -> Result<Vec<ActivityRow>> {
        dispatch!(self, Store, s => s.list_bookable_activities(page))
    }

    async fn count_bookable_activities(&self) -> Result<i64> {
        dispatch!(self, Store, s => s.count_bookable_activities())
    }

    async fn list_vendor_activities(&self, vendor_id: Uuid) -> Result<Vec<ActivityRow>> {
        dispatch!(self, Store, s => s.list_vendor_activities(vendor_id))
    }

    async fn update_activity_details(
        &self,
        id: Uuid,
        data: UpdateActivityDetails,
    ) -> Result<Option<ActivityRow>> {
        dispatch!(self, Store, s => s.update_activity_details(id, data))
    }

    async fn update_activity_capacity(
        &self,
        id: Uuid,
        data: UpdateActivityCapacity,
    ) -> Result<Option<ActivityRow>> {
        dispatch!(self, Store, s => s.update_activity_capacity(id, data))
    }

    async fn update_activity_availability(
        &self,
        id: Uuid,
        data: UpdateActivityAvailability,
    ) -> Result<Option<ActivityRow>> {
        dispatch!(self, Store, s => s.update_activity_availability(id, data))
    }

    async fn booked_participants(&self, key: &ReservationKey) -> Result<i64> {
        dispatch!(self, Store, s => s.booked_participants(key))
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<BookingRow>> {
        dispatch!(self, Store, s => s.get_booking(id))
    }

    async fn list_user_bookings(&self, user_id: Uuid, page: LimitOffset) -> Result<Vec<BookingRow>> {
        dispatch!(self, Store, s => s.list_user_bookings(user_id, page))
    }

    async fn list_activity_bookings(
        &self,
        activity_id: Uuid,
        page: LimitOffset,
    ) -> Result<Vec<BookingRow>> {
        dispatch!(self, Store, s => s.list_activity_bookings(activity_id, page))
    }

    async fn count_user_bookings(&self, user_id: Uuid) -> Result<i64> {
        dispatch!(self, Store, s => s.count_user_bookings(user_id))
    }

    async fn count_activity_bookings(&self, activity_id: Uuid) -> Result<i64> {
        dispatch!(self, Store, s => s.count_activity_bookings(activity_id))
    }

    async fn update_booking_status(
        &self,
        id: Uuid,
        change: StatusChange,
    ) -> Result<Option<BookingRow>> {
        dispatch!(self, Store, s => s.update_booking_status(id, change))
    }

    async fn begin_admission(&self, key: ReservationKey) -> Result<StoreAdmission> {
        match self {
            Store::Postgres(s) => s.begin_admission(key).await.map(StoreAdmission::Postgres),
            Store::Memory(s) => s.begin_admission(key).await.map(StoreAdmission::Memory),
        }
    }
}

impl Admission for StoreAdmission {
    fn key(&self) -> &ReservationKey {
        match self {
            StoreAdmission::Postgres(a) => a.key(),
            StoreAdmission::Memory(a) => a.key(),
        }
    }

    async fn find_activity(&mut self) -> Result<Option<ActivityRow>> {
        dispatch!(self, StoreAdmission, a => a.find_activity())
    }

    async fn find_vendor(&mut self, id: Uuid) -> Result<Option<VendorRow>> {
        dispatch!(self, StoreAdmission, a => a.find_vendor(id))
    }

    async fn find_user(&mut self, id: Uuid) -> Result<Option<UserRow>> {
        dispatch!(self, StoreAdmission, a => a.find_user(id))
    }

    async fn booked_participants(&mut self) -> Result<i64> {
        dispatch!(self, StoreAdmission, a => a.booked_participants())
    }

    async fn insert_booking(&mut self, data: CreateBooking) -> Result<BookingRow> {
        dispatch!(self, StoreAdmission, a => a.insert_booking(data))
    }

    async fn commit(self) -> Result<()> {
        dispatch!(self, StoreAdmission, a => a.commit())
    }
}

use uuid::Uuid;

use infra::models::{ActivityRow, VendorRow};
use infra::pagination::LimitOffset;
use infra::repos::{
    CreateActivity, CreateVendor, UpdateActivityAvailability, UpdateActivityCapacity,
    UpdateActivityDetails,
};
use infra::store::BookingStore;

use crate::auth::{Actor, Role};
use crate::services::BookingError;

pub const DEFAULT_CURRENCY: &str = "SAR";

#[derive(Debug, Clone)]
pub struct NewActivity {
    /// Only admins may create on behalf of another vendor.
    pub vendor_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub price_cents: i32,
    pub currency: Option<String>,
    pub min_participants: i32,
    pub max_participants: i32,
}

/// Vendors and the activities they offer.
#[derive(Clone)]
pub struct CatalogService<S> {
    store: S,
}

impl<S: BookingStore> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Give the caller a vendor profile and the vendor role.
    pub async fn register_vendor(
        &self,
        actor: &Actor,
        business_name: String,
        city: Option<String>,
    ) -> Result<VendorRow, BookingError> {
        let business_name = business_name.trim().to_string();
        if business_name.is_empty() {
            return Err(BookingError::invalid("business name must not be empty"));
        }
        if self.store.get_vendor_by_owner(actor.user_id).await?.is_some() {
            return Err(BookingError::invalid("you already have a vendor profile"));
        }

        let vendor = self
            .store
            .create_vendor(CreateVendor {
                owner_user_id: actor.user_id,
                business_name,
                city,
            })
            .await?;

        if actor.role == Role::User {
            self.store
                .set_user_role(actor.user_id, Role::Vendor.as_str())
                .await?;
        }

        tracing::info!(vendor_id = %vendor.id, owner = %actor.user_id, "Vendor registered");
        Ok(vendor)
    }

    pub async fn vendor_for(&self, actor: &Actor) -> Result<Option<VendorRow>, BookingError> {
        Ok(self.store.get_vendor_by_owner(actor.user_id).await?)
    }

    pub async fn get_vendor(&self, vendor_id: Uuid) -> Result<Option<VendorRow>, BookingError> {
        Ok(self.store.get_vendor(vendor_id).await?)
    }

    pub async fn create_activity(
        &self,
        actor: &Actor,
        input: NewActivity,
    ) -> Result<ActivityRow, BookingError> {
        let vendor_id = match (input.vendor_id, actor.is_admin()) {
            (Some(vendor_id), true) => self
                .store
                .get_vendor(vendor_id)
                .await?
                .ok_or(BookingError::NotFound("vendor"))?
                .id,
            (Some(_), false) => {
                return Err(BookingError::Forbidden(
                    "Only administrators can create activities for another vendor".to_string(),
                ))
            }
            (None, _) => {
                self.store
                    .get_vendor_by_owner(actor.user_id)
                    .await?
                    .ok_or_else(|| {
                        BookingError::Forbidden(
                            "A vendor profile is required to create activities".to_string(),
                        )
                    })?
                    .id
            }
        };

        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(BookingError::invalid("title must not be empty"));
        }
        if input.price_cents < 0 {
            return Err(BookingError::invalid("price must not be negative"));
        }
        validate_capacity(input.min_participants, input.max_participants)?;

        let activity = self
            .store
            .create_activity(CreateActivity {
                vendor_id,
                title,
                description: input.description,
                city: input.city,
                price_cents: input.price_cents,
                currency: input
                    .currency
                    .map(|c| c.trim().to_ascii_uppercase())
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                min_participants: input.min_participants,
                max_participants: input.max_participants,
            })
            .await?;

        tracing::info!(activity_id = %activity.id, vendor_id = %vendor_id, "Activity created");
        Ok(activity)
    }

    pub async fn get_activity(&self, activity_id: Uuid) -> Result<Option<ActivityRow>, BookingError> {
        Ok(self.store.get_activity(activity_id).await?)
    }

    /// Bookable activities, newest first, with the total count of bookable ones.
    pub async fn list_bookable(
        &self,
        page: LimitOffset,
    ) -> Result<(Vec<ActivityRow>, i64), BookingError> {
        let (rows, total) = tokio::try_join!(
            self.store.list_bookable_activities(page),
            self.store.count_bookable_activities()
        )?;
        Ok((rows, total))
    }

    /// A vendor's activities. The vendor itself and admins also see the ones
    /// that are not bookable.
    pub async fn list_vendor_activities(
        &self,
        actor: Option<&Actor>,
        vendor_id: Uuid,
    ) -> Result<Vec<ActivityRow>, BookingError> {
        let vendor = self
            .store
            .get_vendor(vendor_id)
            .await?
            .ok_or(BookingError::NotFound("vendor"))?;

        let sees_all =
            actor.is_some_and(|a| a.is_admin() || a.user_id == vendor.owner_user_id);

        let rows = self.store.list_vendor_activities(vendor.id).await?;
        Ok(if sees_all {
            rows
        } else {
            rows.into_iter().filter(ActivityRow::is_bookable).collect()
        })
    }

    pub async fn update_details(
        &self,
        actor: &Actor,
        activity_id: Uuid,
        data: UpdateActivityDetails,
    ) -> Result<ActivityRow, BookingError> {
        self.authorize(actor, activity_id).await?;

        if data.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(BookingError::invalid("title must not be empty"));
        }
        if data.price_cents.is_some_and(|p| p < 0) {
            return Err(BookingError::invalid("price must not be negative"));
        }

        self.store
            .update_activity_details(activity_id, data)
            .await?
            .ok_or(BookingError::NotFound("activity"))
    }

    /// Existing bookings are left untouched even when the new maximum is
    /// below what is already booked.
    pub async fn update_capacity(
        &self,
        actor: &Actor,
        activity_id: Uuid,
        data: UpdateActivityCapacity,
    ) -> Result<ActivityRow, BookingError> {
        self.authorize(actor, activity_id).await?;
        validate_capacity(data.min_participants, data.max_participants)?;

        let activity = self
            .store
            .update_activity_capacity(activity_id, data)
            .await?
            .ok_or(BookingError::NotFound("activity"))?;

        tracing::info!(
            activity_id = %activity_id,
            min = activity.min_participants,
            max = activity.max_participants,
            "Activity capacity updated"
        );
        Ok(activity)
    }

    pub async fn set_availability(
        &self,
        actor: &Actor,
        activity_id: Uuid,
        data: UpdateActivityAvailability,
    ) -> Result<ActivityRow, BookingError> {
        self.authorize(actor, activity_id).await?;

        self.store
            .update_activity_availability(activity_id, data)
            .await?
            .ok_or(BookingError::NotFound("activity"))
    }

    /// Admins, or the vendor owning the activity.
    async fn authorize(&self, actor: &Actor, activity_id: Uuid) -> Result<(), BookingError> {
        let activity = self
            .store
            .get_activity(activity_id)
            .await?
            .ok_or(BookingError::NotFound("activity"))?;

        if actor.is_admin() {
            return Ok(());
        }

        let owns = self
            .store
            .get_vendor(activity.vendor_id)
            .await?
            .is_some_and(|v| v.owner_user_id == actor.user_id);

        if owns {
            Ok(())
        } else {
            Err(BookingError::Forbidden(
                "Only the activity's vendor or an administrator can change it".to_string(),
            ))
        }
    }
}

pub fn validate_capacity(min_participants: i32, max_participants: i32) -> Result<(), BookingError> {
    if min_participants < 1 {
        return Err(BookingError::invalid("minimum participants must be at least 1"));
    }
    if max_participants < min_participants {
        return Err(BookingError::invalid(
            "maximum participants must not be below the minimum",
        ));
    }
    Ok(())
}

use infra::models::BookingStatus;

/// Who may apply a given status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    /// The booking's user, the vendor owning the activity, or an admin.
    OwnerVendorOrAdmin,
    /// The vendor owning the activity, or an admin.
    VendorOrAdmin,
    AdminOnly,
}

impl Authority {
    pub fn permits(&self, is_owner: bool, is_vendor: bool, is_admin: bool) -> bool {
        match self {
            Authority::OwnerVendorOrAdmin => is_owner || is_vendor || is_admin,
            Authority::VendorOrAdmin => is_vendor || is_admin,
            Authority::AdminOnly => is_admin,
        }
    }
}

/// The booking lifecycle. `None` means the transition does not exist.
pub fn required_authority(from: BookingStatus, to: BookingStatus) -> Option<Authority> {
    use BookingStatus::*;

    match (from, to) {
        (Pending, Confirmed) => Some(Authority::VendorOrAdmin),
        (Pending | Confirmed, Cancelled) => Some(Authority::OwnerVendorOrAdmin),
        (Confirmed, Completed | NoShow) => Some(Authority::VendorOrAdmin),
        (Cancelled, Refunded) => Some(Authority::AdminOnly),
        _ => None,
    }
}

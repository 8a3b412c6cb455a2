//! Flat re-export of the GraphQL types spread over the domain modules.

pub use crate::gql::common::types::{PaginatedResponse, PaginationInput};
pub use crate::gql::domains::activities::types::{
    Activity, ActivityStatus, AvailabilityReport, CreateActivityInput, SetActivityAvailabilityInput,
    UpdateActivityCapacityInput, UpdateActivityDetailsInput,
};
pub use crate::gql::domains::bookings::types::{
    Booking, BookingEvent, BookingEventType, BookingSnapshot, BookingStatus, CancelBookingInput,
    CreateBookingInput, UpdateBookingStatusInput,
};
pub use crate::gql::domains::users::types::User;
pub use crate::gql::domains::vendors::types::{RegisterVendorInput, Vendor};

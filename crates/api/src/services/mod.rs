pub mod booking_service;
pub mod catalog_service;
pub mod error;
pub mod status;

pub use booking_service::{Availability, BookingRequest, BookingService};
pub use catalog_service::{CatalogService, NewActivity};
pub use error::BookingError;
pub use status::Authority;

pub mod activities;
pub mod bookings;
pub mod users;
pub mod vendors;

pub use activities::{
    CreateActivity, UpdateActivityAvailability, UpdateActivityCapacity, UpdateActivityDetails,
};
pub use bookings::{CreateBooking, StatusChange};
pub use users::CreateUser;
pub use vendors::CreateVendor;

pub mod activities;
pub mod bookings;
pub mod extract;

pub use extract::{AppJson, AppPath, AppQuery};

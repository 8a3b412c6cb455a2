// Each domain contains: mod.rs, resolvers.rs, types.rs

pub mod activities;
pub mod bookings;
pub mod users;
pub mod vendors;

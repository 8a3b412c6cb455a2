pub mod config;
pub mod extract;
pub mod jwt;
pub mod permissions;

pub use config::AuthConfig;
pub use extract::AuthUser;
pub use jwt::{Claims, JwtService};
pub use permissions::{Actor, Role};

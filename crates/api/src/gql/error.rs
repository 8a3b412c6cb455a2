use std::sync::Arc;

use async_graphql::ErrorExtensions;

use crate::error::AppError;
use crate::services::BookingError;

/// Errors raised inside resolvers rather than by a service.
///
/// async-graphql has a blanket `impl<T: Display + Send + Sync + 'static> From<T> for Error`,
/// so any type implementing `Display` auto-converts via `?`.
#[derive(Debug)]
pub enum GqlError {
    Uuid(uuid::Error),
}

impl std::fmt::Display for GqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GqlError::Uuid(e) => write!(f, "Invalid ID: {e}"),
        }
    }
}

impl std::error::Error for GqlError {}

impl From<uuid::Error> for GqlError {
    fn from(e: uuid::Error) -> Self {
        GqlError::Uuid(e)
    }
}

/// Extension trait that converts any `Result<T, E>` where `E: Display`
/// into `async_graphql::Result<T>` with a contextual message prefix.
///
/// Usage: `Uuid::parse_str(id).gql_err("Invalid activity ID")?`
pub trait ResultExt<T> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error> {
        self.map_err(|e| async_graphql::Error::new(format!("{context}: {e}")))
    }
}

/// Data loader failures are logged here; clients only see a generic message.
pub fn loader_error(e: Arc<sqlx::Error>) -> async_graphql::Error {
    tracing::error!("Data loader error: {e}");
    AppError::Internal("failed to load related data".to_string()).extend()
}

/// Service failures keep their machine-readable code under `extensions.code`.
/// Capacity rejections also report what was asked for and what is left.
impl ErrorExtensions for BookingError {
    fn extend(&self) -> async_graphql::Error {
        if let BookingError::Store(e) = self {
            tracing::error!("Database error: {e}");
        }

        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| {
            ext.set("code", self.code());
            if let BookingError::CapacityExceeded {
                requested,
                remaining,
            } = self
            {
                ext.set("requested", *requested);
                ext.set("remaining", *remaining);
            }
        })
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        if let AppError::Db(e) = self {
            tracing::error!("Database error: {e}");
        }

        async_graphql::Error::new(self.to_string())
            .extend_with(|_, ext| ext.set("code", self.code()))
    }
}

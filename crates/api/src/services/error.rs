use infra::models::BookingStatus;
use thiserror::Error;

/// Failures of the booking core. None of them is retried; the caller has to
/// change the request (activity, date, participants) instead.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("insufficient capacity: requested {requested} participants, {remaining} remaining")]
    CapacityExceeded { requested: i64, remaining: i64 },

    #[error("{0}")]
    InvalidRequest(String),

    #[error("cannot change booking status from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("{0}")]
    Forbidden(String),

    #[error("storage error")]
    Store(#[from] sqlx::Error),
}

impl BookingError {
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::NotFound(_) => "NOT_FOUND",
            BookingError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            BookingError::InvalidRequest(_) | BookingError::InvalidTransition { .. } => {
                "BAD_REQUEST"
            }
            BookingError::Forbidden(_) => "FORBIDDEN",
            BookingError::Store(_) => "INTERNAL",
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        BookingError::InvalidRequest(msg.into())
    }
}

pub mod booking;
pub mod clock;
pub mod identity;
pub mod invoice;
pub mod repository;
pub mod request;

pub use request::ValidationError;

/// Failures surfaced by the booking workflow to its callers.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    #[error("No active confirmation for this session")]
    NoActiveConfirmation,
    #[error("Internal workflow error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, BookingError>;

/// Error type returned by the storage traits in [`repository`].
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

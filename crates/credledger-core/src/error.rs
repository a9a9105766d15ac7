use crate::status::AcceptanceStatus;

/// Core record errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: AcceptanceStatus,
        to: AcceptanceStatus,
    },

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

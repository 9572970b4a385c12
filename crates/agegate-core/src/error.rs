use crate::record_state::RecordState;

/// Core errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: RecordState, to: RecordState },

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("configuration error: {0}")]
    Config(String),
}

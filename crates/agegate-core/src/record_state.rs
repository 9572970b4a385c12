use std::fmt;

use crate::error::CoreError;

/// Lifecycle states of a verification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RecordState {
    /// Initial state. The only state in which a record is valid.
    Active,
    /// `now >= expires_at`. Never reversed.
    Expired,
    /// Explicitly revoked. Final state.
    Revoked,
}

impl RecordState {
    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Revoked)
    }

    /// Whether a record in this state may be relied upon.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Expired => write!(f, "Expired"),
            Self::Revoked => write!(f, "Revoked"),
        }
    }
}

/// Events that move a record between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordEvent {
    /// The validity window has elapsed.
    Expire,
    /// An authorized party revoked the record.
    Revoke,
}

/// Verification record transitions.
///
/// Valid transitions:
/// - Active → Expired (Expire)
/// - Active → Revoked (Revoke)
/// - Expired → Revoked (Revoke)
pub struct RecordStateMachine;

impl RecordStateMachine {
    /// Attempt a state transition based on an event.
    pub fn transition(current: RecordState, event: RecordEvent) -> Result<RecordState, CoreError> {
        let new_state = match (current, event) {
            (RecordState::Active, RecordEvent::Expire) => RecordState::Expired,
            (RecordState::Active, RecordEvent::Revoke) => RecordState::Revoked,
            (RecordState::Expired, RecordEvent::Revoke) => RecordState::Revoked,
            _ => {
                let target = match event {
                    RecordEvent::Expire => RecordState::Expired,
                    RecordEvent::Revoke => RecordState::Revoked,
                };
                return Err(CoreError::InvalidStateTransition {
                    from: current,
                    to: target,
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %new_state,
            event = ?event,
            "verification record state transition"
        );

        Ok(new_state)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: RecordState, event: RecordEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}

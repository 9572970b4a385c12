use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::record_state::{RecordEvent, RecordState, RecordStateMachine};
use crate::types::{Age, ProofHash, Timestamp};

/// A registered, successfully verified age proof.
///
/// Records are kept for audit after they stop being valid; only an explicit
/// [`revoke`](Self::revoke) mutates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    id: String,
    proof_hash: ProofHash,
    minimum_age: Age,
    issued_at: Timestamp,
    expires_at: Timestamp,
    revoked: bool,
}

impl VerificationRecord {
    pub fn new(
        id: String,
        proof_hash: ProofHash,
        minimum_age: Age,
        issued_at: Timestamp,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            id,
            proof_hash,
            minimum_age,
            issued_at,
            expires_at,
            revoked: false,
        }
    }

    /// A record issued now and valid for `validity`. A validity past the end
    /// of the calendar saturates at the latest representable instant.
    pub fn create(id: String, proof_hash: ProofHash, minimum_age: Age, validity: Duration) -> Self {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(validity)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self::new(
            id,
            proof_hash,
            minimum_age,
            Timestamp::from(now),
            Timestamp::from(expires_at),
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn proof_hash(&self) -> &ProofHash {
        &self.proof_hash
    }

    pub fn minimum_age(&self) -> Age {
        self.minimum_age
    }

    pub fn issued_at(&self) -> Timestamp {
        self.issued_at
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    /// Lifecycle state as of `now`.
    pub fn state_at(&self, now: DateTime<Utc>) -> RecordState {
        if self.revoked {
            RecordState::Revoked
        } else if now >= self.expires_at.value() {
            RecordState::Expired
        } else {
            RecordState::Active
        }
    }

    pub fn state(&self) -> RecordState {
        self.state_at(Utc::now())
    }

    /// `!revoked && now < expires_at`.
    pub fn is_valid(&self) -> bool {
        self.state().is_valid()
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now).is_valid()
    }

    /// Revoke the record. One-way; revoking twice is an invalid transition.
    pub fn revoke(&mut self) -> Result<(), CoreError> {
        RecordStateMachine::transition(self.state(), RecordEvent::Revoke)?;
        self.revoked = true;
        Ok(())
    }
}

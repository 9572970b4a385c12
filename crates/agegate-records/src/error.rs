use agegate_proof::VerificationError;

/// Verification record errors.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("proof rejected: {0}")]
    ProofRejected(VerificationError),

    #[error("proof already registered: {0}")]
    DuplicateProof(String),

    #[error("verification record not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Core(#[from] agegate_core::CoreError),
}

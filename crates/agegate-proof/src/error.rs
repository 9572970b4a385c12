/// Proof generation errors.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    #[error("credential is required")]
    MissingCredential,

    #[error("minimum age must be between 0 and 150, got {0}")]
    InvalidAge(i64),

    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("verification date cannot be before date of birth")]
    TemporalOrder,

    #[error("credential has expired")]
    ExpiredCredential,

    #[error("holder does not meet minimum age requirement of {0}")]
    AgeRequirementNotMet(u32),

    #[error("no unused birth-date certificates left in credential")]
    CertificatesExhausted,

    #[error("proof generation failed: {0}")]
    GenerationFailed(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] agegate_crypto::CryptoError),
}

/// Credential issuance and trust store errors.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid issuer configuration: {0}")]
    InvalidIssuerConfig(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] agegate_crypto::CryptoError),
}

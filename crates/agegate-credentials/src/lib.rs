//! Agegate Credentials — credential issuance, birth-date certificates, and the
//! issuer trust store.

pub mod credential;
pub mod error;
pub mod issuer;
pub mod trust_store;

pub use credential::{
    birth_instant, certificate_message, BirthDateCertificate, CertificateOpening, Credential,
    SECONDS_PER_YEAR,
};
pub use error::CredentialError;
pub use issuer::{CredentialIssuer, IssuerConfig, MAX_CREDENTIAL_AGE_YEARS};
pub use trust_store::{InMemoryTrustStore, IssuerPublicConfig, TrustStore};

//! Shared fixtures for the Agegate end-to-end tests.

use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;

use agegate_core::VerifierConfig;
use agegate_credentials::{CredentialIssuer, InMemoryTrustStore, IssuerConfig};
use agegate_crypto::KeyPair;
use agegate_proof::Verifier;

/// An issuer with a fresh key pair.
pub fn issuer(name: &str, certificates: usize) -> CredentialIssuer {
    let config = IssuerConfig::new(format!("{}-id", name), name, KeyPair::generate())
        .with_certificate_batch_size(certificates);
    CredentialIssuer::new(config).expect("issuer fixture")
}

/// A verifier with default settings and an empty trust store.
pub fn verifier() -> Verifier {
    Verifier::new(Arc::new(InMemoryTrustStore::new()), &VerifierConfig::default())
}

/// A verifier that trusts exactly `issuers`.
pub fn verifier_trusting(issuers: &[&CredentialIssuer]) -> Verifier {
    let verifier = verifier();
    for issuer in issuers {
        verifier
            .add_trusted_issuer(issuer.public_config())
            .expect("trust fixture");
    }
    verifier
}

/// Birth date `years` 365.25-day years before today, rounded one day earlier.
pub fn years_ago(years: i64) -> NaiveDate {
    (Utc::now() - Duration::seconds(years * 31_557_600) - Duration::days(1)).date_naive()
}

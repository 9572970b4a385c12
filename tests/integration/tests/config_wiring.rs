//! Integration test: a TOML configuration drives issuer and verifier setup.

use std::sync::Arc;

use agegate_core::AgegateConfig;
use agegate_credentials::{CredentialIssuer, InMemoryTrustStore, IssuerConfig};
use agegate_crypto::KeyPair;
use agegate_integration_tests::years_ago;
use agegate_proof::{ProofGenerator, Verifier};

#[test]
fn test_config_trusted_issuers_and_batch_size() {
    let keypair = KeyPair::from_seed(&[42u8; 32]);
    let toml = format!(
        r#"
[issuer]
issuer_id = "dmv"
issuer_name = "Department of Motor Vehicles"
certificate_batch_size = 3
credential_validity_years = 2

[verifier]
max_proof_age_secs = 600

[[verifier.trusted_issuers]]
id = "dmv"
name = "Department of Motor Vehicles"
public_key = "{}"
"#,
        keypair.public_key().to_hex()
    );
    let config = AgegateConfig::from_toml(&toml).unwrap();

    let issuer =
        CredentialIssuer::new(IssuerConfig::from_settings(&config.issuer, Some(keypair))).unwrap();
    let mut credential = issuer.issue(years_ago(19)).unwrap();
    assert_eq!(credential.certificates.len(), 3);
    assert!(credential.expires_at < credential.issued_at + chrono::Duration::days(3 * 365));

    let store = InMemoryTrustStore::from_entries(&config.verifier.trusted_issuers).unwrap();
    let verifier = Verifier::new(Arc::new(store), &config.verifier);
    let mut proof = ProofGenerator::new().prove(&mut credential, 18).unwrap();
    assert!(verifier.verify(&proof).is_valid);

    proof.generated_at -= chrono::Duration::minutes(11);
    assert_eq!(
        verifier.verify(&proof).error_message().as_deref(),
        Some("Proof is too old (max 10 minutes)")
    );
}

#[test]
fn test_issuer_without_key_from_config() {
    let config = AgegateConfig::default();
    let result = CredentialIssuer::new(IssuerConfig::from_settings(&config.issuer, None));
    assert!(matches!(
        result,
        Err(agegate_credentials::CredentialError::Configuration(_))
    ));
}

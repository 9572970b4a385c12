//! Integration test: issuer → holder → verifier across crates.

use std::collections::HashSet;

use agegate_credentials::TrustStore;
use agegate_integration_tests::{issuer, verifier, verifier_trusting, years_ago};
use agegate_proof::{ProofError, ProofGenerator, VerificationError};
use chrono::{Duration, Utc};

#[test]
fn test_adult_proves_eighteen() {
    let issuer = issuer("Government Identity Authority", 4);
    let verifier = verifier_trusting(&[&issuer]);
    let mut credential = issuer.issue(years_ago(25)).unwrap();

    let proof = ProofGenerator::new().prove(&mut credential, 18).unwrap();
    let result = verifier.verify(&proof);

    assert!(result.is_valid, "{:?}", result.error);
    assert_eq!(result.minimum_age, 18);
    assert!(result.error.is_none());
}

#[test]
fn test_under_threshold_fails_at_generation() {
    let issuer = issuer("gov", 4);
    let mut credential = issuer.issue(years_ago(25)).unwrap();
    let result = ProofGenerator::new().prove(&mut credential, 30);
    assert!(matches!(result, Err(ProofError::AgeRequirementNotMet(30))));
}

#[test]
fn test_every_threshold_up_to_floor_age_verifies() {
    let issuer = issuer("gov", 8);
    let verifier = verifier_trusting(&[&issuer]);
    let mut credential = issuer.issue(years_ago(40)).unwrap();
    let generator = ProofGenerator::new();

    for minimum_age in [0, 13, 18, 21, 39, 40] {
        let proof = generator.prove(&mut credential, minimum_age).unwrap();
        assert!(verifier.verify(&proof).is_valid, "minimum age {}", minimum_age);
    }
    assert!(matches!(
        generator.prove(&mut credential, 41),
        Err(ProofError::AgeRequirementNotMet(41))
    ));
}

#[test]
fn test_expired_credential_cannot_prove() {
    let issuer = issuer("gov", 2);
    let mut credential = issuer
        .issue_with_expiration(years_ago(25), Utc::now() - Duration::days(30))
        .unwrap();
    assert!(matches!(
        ProofGenerator::new().prove(&mut credential, 18),
        Err(ProofError::ExpiredCredential)
    ));
}

#[test]
fn test_commitments_are_unlinkable() {
    let issuer = issuer("gov", 8);
    let verifier = verifier_trusting(&[&issuer]);
    let mut credential = issuer.issue(years_ago(30)).unwrap();
    let generator = ProofGenerator::new();

    let proofs: Vec<_> = (0..6).map(|_| generator.prove(&mut credential, 18).unwrap()).collect();
    let commitments: HashSet<_> = proofs.iter().map(|p| p.public_inputs.commitment.as_str()).collect();
    assert_eq!(commitments.len(), proofs.len());
    assert!(proofs.iter().all(|p| verifier.verify(p).is_valid));
}

#[test]
fn test_separate_generators_present_distinct_certificates() {
    let issuer = issuer("gov", 3);
    let verifier = verifier_trusting(&[&issuer]);
    let mut credential = issuer.issue(years_ago(30)).unwrap();

    let proofs: Vec<_> = (0..3)
        .map(|_| ProofGenerator::new().prove(&mut credential, 18).unwrap())
        .collect();
    let certificates: HashSet<_> = proofs
        .iter()
        .map(|p| p.proof_bytes().unwrap()[1..101].to_vec())
        .collect();
    assert_eq!(certificates.len(), 3);
    assert!(proofs.iter().all(|p| verifier.verify(p).is_valid));
}

#[test]
fn test_refreshed_credential_keeps_proving() {
    let issuer = issuer("gov", 1);
    let verifier = verifier_trusting(&[&issuer]);
    let mut credential = issuer.issue(years_ago(30)).unwrap();

    ProofGenerator::new().prove(&mut credential, 18).unwrap();
    assert!(matches!(
        ProofGenerator::new().prove(&mut credential, 18),
        Err(ProofError::CertificatesExhausted)
    ));

    // The holder persists the drained credential and comes back later.
    let mut stored = agegate_credentials::Credential::from_json(&credential.to_json().unwrap()).unwrap();
    assert_eq!(issuer.refresh_certificates(&mut stored).unwrap(), 1);
    let proof = ProofGenerator::new().prove(&mut stored, 21).unwrap();
    assert!(verifier.verify(&proof).is_valid);
}

#[test]
fn test_serialized_proof_hides_birth_date() {
    let issuer = issuer("gov", 2);
    let birth_date = years_ago(27);
    let mut credential = issuer.issue(birth_date).unwrap();
    let json = ProofGenerator::new().prove(&mut credential, 18).unwrap().to_json().unwrap();

    assert!(!json.contains(&birth_date.format("%Y-%m-%d").to_string()));
    assert!(!json.contains(&credential.birth_instant().to_rfc3339()));
    assert!(!json.contains(&credential.id));
}

#[test]
fn test_untrusted_issuer_rejected() {
    let trusted = issuer("trusted", 2);
    let rogue = issuer("rogue", 2);
    let verifier = verifier_trusting(&[&trusted]);
    let mut credential = rogue.issue(years_ago(30)).unwrap();

    let result = verifier.verify(&ProofGenerator::new().prove(&mut credential, 18).unwrap());
    assert!(!result.is_valid);
    assert_eq!(result.error_message().as_deref(), Some("Issuer is not trusted"));
}

#[test]
fn test_proof_older_than_an_hour_rejected() {
    let issuer = issuer("gov", 2);
    let verifier = verifier_trusting(&[&issuer]);
    let mut credential = issuer.issue(years_ago(30)).unwrap();
    let mut proof = ProofGenerator::new().prove(&mut credential, 18).unwrap();
    proof.generated_at = Utc::now() - Duration::hours(2);

    let result = verifier.verify(&proof);
    assert!(!result.is_valid);
    assert!(result.error_message().unwrap().contains("too old"));
}

#[test]
fn test_issuer_key_swap_is_cryptographic_failure() {
    let real = issuer("real", 2);
    let other = issuer("other", 2);
    let verifier = verifier_trusting(&[&real, &other]);
    let mut credential = real.issue(years_ago(30)).unwrap();
    let mut proof = ProofGenerator::new().prove(&mut credential, 18).unwrap();
    proof.public_inputs.issuer_public_key = other.public_config().public_key.to_hex();

    assert_eq!(verifier.verify(&proof).error, Some(VerificationError::Cryptographic));
}

#[test]
fn test_tampered_proof_bytes_fail() {
    let issuer = issuer("gov", 2);
    let verifier = verifier_trusting(&[&issuer]);
    let mut credential = issuer.issue(years_ago(30)).unwrap();
    let generator = ProofGenerator::new();
    let proof = generator.prove(&mut credential, 18).unwrap();

    // Swap in another valid proof's body: same issuer, different statement.
    let other = generator.prove(&mut credential, 18).unwrap();
    let mut spliced = proof.clone();
    spliced.proof = other.proof.clone();
    assert_eq!(verifier.verify(&spliced).error, Some(VerificationError::Cryptographic));

    let mut swapped = proof;
    swapped.public_inputs.commitment = other.public_inputs.commitment.clone();
    assert_eq!(verifier.verify(&swapped).error, Some(VerificationError::Cryptographic));
}

#[test]
fn test_garbage_input_is_structural() {
    let verifier = verifier();
    for input in ["", "[]", "{\"proof\": 42}", "\u{0}\u{1}", "{\"minimumAge\": 18}"] {
        let result = verifier.verify_json(input);
        assert!(!result.is_valid);
        assert!(matches!(result.error, Some(VerificationError::Structural(_))), "{:?}", input);
    }
}

#[test]
fn test_removing_issuer_revokes_trust() {
    let issuer = issuer("gov", 2);
    let verifier = verifier_trusting(&[&issuer]);
    let mut credential = issuer.issue(years_ago(30)).unwrap();
    let proof = ProofGenerator::new().prove(&mut credential, 18).unwrap();
    assert!(verifier.verify(&proof).is_valid);

    assert!(verifier.remove_trusted_issuer(&issuer.public_config().public_key));
    assert_eq!(verifier.verify(&proof).error, Some(VerificationError::Untrusted));
}

#[test]
fn test_credential_survives_json_transfer() {
    let issuer = issuer("gov", 2);
    let verifier = verifier_trusting(&[&issuer]);
    let credential = issuer.issue(years_ago(22)).unwrap();
    let mut received = agegate_credentials::Credential::from_json(&credential.to_json().unwrap()).unwrap();

    let proof_json = ProofGenerator::new().prove(&mut received, 21).unwrap().to_json().unwrap();
    assert!(verifier.verify_json(&proof_json).is_valid);
}

#[test]
fn test_trust_store_upsert_idempotent() {
    let issuer = issuer("gov", 1);
    let store = agegate_credentials::InMemoryTrustStore::new();
    assert!(store.upsert(issuer.public_config()).unwrap());
    assert!(!store.upsert(issuer.public_config()).unwrap());
    assert_eq!(store.list().len(), 1);
}

//! Integration test: verified proofs become verification records.

use std::sync::Arc;

use agegate_core::{RecordConfig, RecordState};
use agegate_integration_tests::{issuer, verifier_trusting, years_ago};
use agegate_proof::{ProofGenerator, VerificationError};
use agegate_records::{InMemoryVerificationRepository, RecordError, VerificationService};
use chrono::{Duration, Utc};

fn service(verifier: agegate_proof::Verifier, config: RecordConfig) -> Arc<VerificationService> {
    Arc::new(VerificationService::new(
        Arc::new(verifier),
        Arc::new(InMemoryVerificationRepository::new()),
        config,
    ))
}

#[tokio::test]
async fn test_register_check_revoke() {
    let issuer = issuer("gov", 2);
    let service = service(verifier_trusting(&[&issuer]), RecordConfig::default());
    let mut credential = issuer.issue(years_ago(30)).unwrap();
    let proof = ProofGenerator::new().prove(&mut credential, 18).unwrap();

    let record = service.register(&proof).await.unwrap();
    assert_eq!(record.state(), RecordState::Active);
    assert_eq!(record.proof_hash().as_str(), proof.public_inputs.commitment);
    assert!(service.check(proof.proof_hash(), 18).await.unwrap());

    service.revoke(record.id()).await.unwrap();
    let stored = service.get(record.id()).await.unwrap();
    assert_eq!(stored.state(), RecordState::Revoked);
    assert!(!stored.is_valid());
    assert!(stored.expires_at().value() > Utc::now());
    assert!(!service.check(proof.proof_hash(), 18).await.unwrap());
}

#[tokio::test]
async fn test_untrusted_proof_is_not_recorded() {
    let trusted = issuer("trusted", 1);
    let rogue = issuer("rogue", 1);
    let service = service(verifier_trusting(&[&trusted]), RecordConfig::default());
    let proof = ProofGenerator::new()
        .prove(&mut rogue.issue(years_ago(30)).unwrap(), 18)
        .unwrap();

    let err = service.register(&proof).await.unwrap_err();
    assert!(matches!(err, RecordError::ProofRejected(VerificationError::Untrusted)));
    assert!(!service.check(proof.proof_hash(), 0).await.unwrap());
}

#[tokio::test]
async fn test_zero_day_validity_records_expire_immediately() {
    let issuer = issuer("gov", 1);
    let config = RecordConfig {
        validity_days: 0,
        ..RecordConfig::default()
    };
    let service = service(verifier_trusting(&[&issuer]), config);
    let proof = ProofGenerator::new()
        .prove(&mut issuer.issue(years_ago(30)).unwrap(), 18)
        .unwrap();

    let record = service.register(&proof).await.unwrap();
    assert_eq!(record.state_at(Utc::now() + Duration::seconds(1)), RecordState::Expired);
    assert!(!service.check(proof.proof_hash(), 18).await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_admits_one() {
    let issuer = issuer("gov", 1);
    let service = service(verifier_trusting(&[&issuer]), RecordConfig::default());
    let proof = ProofGenerator::new()
        .prove(&mut issuer.issue(years_ago(30)).unwrap(), 18)
        .unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            let proof = proof.clone();
            tokio::spawn(async move { service.register(&proof).await })
        })
        .collect();

    let mut registered = 0;
    let mut duplicates = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => registered += 1,
            Err(RecordError::DuplicateProof(_)) => duplicates += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }
    assert_eq!(registered, 1);
    assert_eq!(duplicates, 7);
}

use std::sync::Arc;

use agegate_core::{Age, ProofHash, RecordConfig, VerificationRecord};
use agegate_crypto::generate_secure_id;
use agegate_proof::{AgeProof, VerificationError, Verifier};

use crate::error::RecordError;
use crate::repository::VerificationRecordRepository;

/// Registers verified proofs and answers trust queries about them.
pub struct VerificationService {
    verifier: Arc<Verifier>,
    repository: Arc<dyn VerificationRecordRepository>,
    config: RecordConfig,
}

impl VerificationService {
    pub fn new(
        verifier: Arc<Verifier>,
        repository: Arc<dyn VerificationRecordRepository>,
        config: RecordConfig,
    ) -> Self {
        Self {
            verifier,
            repository,
            config,
        }
    }

    /// Verify `proof` and record it. Each proof can be registered once.
    pub async fn register(&self, proof: &AgeProof) -> Result<VerificationRecord, RecordError> {
        let result = self.verifier.verify(proof);
        if !result.is_valid {
            let reason = result.error.unwrap_or(VerificationError::Cryptographic);
            return Err(RecordError::ProofRejected(reason));
        }

        let proof_hash = ProofHash::new(proof.proof_hash())?;
        let minimum_age = Age::new(proof.minimum_age as i64)?;
        let record = VerificationRecord::create(
            generate_secure_id(),
            proof_hash.clone(),
            minimum_age,
            self.config.validity(),
        );

        if !self.repository.insert_if_absent(record.clone()).await? {
            tracing::debug!(proof_hash = %proof_hash, "duplicate proof registration");
            return Err(RecordError::DuplicateProof(proof_hash.to_string()));
        }

        tracing::info!(
            record_id = %record.id(),
            minimum_age = %minimum_age,
            expires = %record.expires_at(),
            "verification record created"
        );
        Ok(record)
    }

    /// Whether a valid record for `proof_hash` covers `minimum_age`.
    pub async fn check(&self, proof_hash: &str, minimum_age: i64) -> Result<bool, RecordError> {
        let proof_hash = ProofHash::new(proof_hash)?;
        let minimum_age = Age::new(minimum_age)?;
        let record = self.repository.find_by_proof_hash(&proof_hash).await?;
        Ok(record.is_some_and(|r| can_trust(&r, minimum_age)))
    }

    /// [`check`](Self::check) against the configured default minimum age.
    pub async fn check_default(&self, proof_hash: &str) -> Result<bool, RecordError> {
        self.check(proof_hash, self.config.default_minimum_age as i64)
            .await
    }

    pub async fn get(&self, id: &str) -> Result<VerificationRecord, RecordError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RecordError::NotFound(id.to_string()))
    }

    /// Revoke a record. Revoking twice is an error.
    pub async fn revoke(&self, id: &str) -> Result<VerificationRecord, RecordError> {
        let record = self.repository.revoke(id).await?;
        tracing::info!(record_id = %id, "verification record revoked");
        Ok(record)
    }
}

/// A record can be relied on for `minimum_age` while valid and at least as strict.
pub fn can_trust(record: &VerificationRecord, minimum_age: Age) -> bool {
    record.is_valid() && record.minimum_age().satisfies(minimum_age)
}

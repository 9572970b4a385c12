use async_trait::async_trait;

use agegate_core::{ProofHash, VerificationRecord};

use crate::error::RecordError;

/// Storage for verification records.
///
/// Implementations must be read-after-write consistent: a lookup issued after
/// `save` or `insert_if_absent` returns observes the stored record.
#[async_trait]
pub trait VerificationRecordRepository: Send + Sync {
    /// Insert or overwrite a record.
    async fn save(&self, record: VerificationRecord) -> Result<(), RecordError>;

    /// Store `record` only if no record with its proof hash exists.
    ///
    /// The check and the insert must be one atomic step. Returns `false` if a
    /// record for the same proof hash was already present.
    async fn insert_if_absent(&self, record: VerificationRecord) -> Result<bool, RecordError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<VerificationRecord>, RecordError>;

    async fn find_by_proof_hash(
        &self,
        proof_hash: &ProofHash,
    ) -> Result<Option<VerificationRecord>, RecordError>;

    /// Replace an existing record. Fails with `NotFound` if absent.
    async fn update(&self, record: VerificationRecord) -> Result<(), RecordError>;

    /// Revoke a stored record as one atomic step and return it.
    ///
    /// Fails with `NotFound` for an unknown id and with an invalid state
    /// transition if the record is already revoked, so of several concurrent
    /// revocations exactly one succeeds.
    async fn revoke(&self, id: &str) -> Result<VerificationRecord, RecordError>;

    /// Returns `true` if a record was removed.
    async fn delete(&self, id: &str) -> Result<bool, RecordError>;

    async fn exists(&self, proof_hash: &ProofHash) -> Result<bool, RecordError>;
}

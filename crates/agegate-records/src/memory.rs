use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use agegate_core::{ProofHash, VerificationRecord};

use crate::error::RecordError;
use crate::repository::VerificationRecordRepository;

/// In-process repository backed by two `DashMap`s.
///
/// `insert_if_absent` holds the proof-hash index entry lock while it writes
/// the record, so concurrent registrations of one proof cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryVerificationRepository {
    /// Record id → record.
    records: DashMap<String, VerificationRecord>,
    /// Proof hash → record id.
    by_proof_hash: DashMap<ProofHash, String>,
}

impl InMemoryVerificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl VerificationRecordRepository for InMemoryVerificationRepository {
    async fn save(&self, record: VerificationRecord) -> Result<(), RecordError> {
        let id = record.id().to_string();
        let proof_hash = record.proof_hash().clone();
        if let Some(previous) = self.records.insert(id.clone(), record) {
            if previous.proof_hash() != &proof_hash {
                self.by_proof_hash
                    .remove_if(previous.proof_hash(), |_, owner| owner == &id);
            }
        }
        self.by_proof_hash.insert(proof_hash, id);
        Ok(())
    }

    async fn insert_if_absent(&self, record: VerificationRecord) -> Result<bool, RecordError> {
        match self.by_proof_hash.entry(record.proof_hash().clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                let id = record.id().to_string();
                self.records.insert(id.clone(), record);
                slot.insert(id);
                Ok(true)
            }
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<VerificationRecord>, RecordError> {
        Ok(self.records.get(id).map(|e| e.value().clone()))
    }

    async fn find_by_proof_hash(
        &self,
        proof_hash: &ProofHash,
    ) -> Result<Option<VerificationRecord>, RecordError> {
        let Some(id) = self.by_proof_hash.get(proof_hash).map(|e| e.value().clone()) else {
            return Ok(None);
        };
        Ok(self.records.get(&id).map(|e| e.value().clone()))
    }

    async fn update(&self, record: VerificationRecord) -> Result<(), RecordError> {
        match self.records.get_mut(record.id()) {
            Some(mut existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RecordError::NotFound(record.id().to_string())),
        }
    }

    async fn revoke(&self, id: &str) -> Result<VerificationRecord, RecordError> {
        let mut record = self
            .records
            .get_mut(id)
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;
        record.revoke()?;
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, RecordError> {
        match self.records.remove(id) {
            Some((_, record)) => {
                self.by_proof_hash.remove(record.proof_hash());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn exists(&self, proof_hash: &ProofHash) -> Result<bool, RecordError> {
        Ok(self.by_proof_hash.contains_key(proof_hash))
    }
}

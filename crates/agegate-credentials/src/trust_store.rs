use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use agegate_core::TrustedIssuerEntry;
use agegate_crypto::PublicKey;

use crate::error::CredentialError;

/// Public identity of an issuer. Holds no private key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerPublicConfig {
    pub id: String,
    pub name: String,
    pub public_key: PublicKey,
}

impl IssuerPublicConfig {
    fn validate(&self) -> Result<(), CredentialError> {
        if self.id.trim().is_empty() {
            return Err(CredentialError::InvalidIssuerConfig("issuer id is empty".into()));
        }
        if self.name.trim().is_empty() {
            return Err(CredentialError::InvalidIssuerConfig("issuer name is empty".into()));
        }
        Ok(())
    }
}

impl TryFrom<&TrustedIssuerEntry> for IssuerPublicConfig {
    type Error = CredentialError;

    fn try_from(entry: &TrustedIssuerEntry) -> Result<Self, Self::Error> {
        let public_key = PublicKey::from_hex(&entry.public_key).map_err(|e| {
            CredentialError::InvalidIssuerConfig(format!("issuer {}: {}", entry.id, e))
        })?;
        Ok(Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            public_key,
        })
    }
}

/// Issuer public keys a verifier accepts proofs from.
///
/// Implementations must allow concurrent readers and replace entries
/// atomically: a reader sees either the old or the new config, never a mix.
pub trait TrustStore: Send + Sync {
    /// Insert or replace the entry keyed by `config.public_key`.
    /// Returns `true` if the key was not present before.
    fn upsert(&self, config: IssuerPublicConfig) -> Result<bool, CredentialError>;

    /// Returns `true` if an entry was removed.
    fn remove(&self, public_key: &PublicKey) -> bool;

    fn get(&self, public_key: &PublicKey) -> Option<IssuerPublicConfig>;

    fn list(&self) -> Vec<IssuerPublicConfig>;

    fn contains(&self, public_key: &PublicKey) -> bool {
        self.get(public_key).is_some()
    }
}

/// [`TrustStore`] backed by a `DashMap`.
#[derive(Debug, Default)]
pub struct InMemoryTrustStore {
    issuers: DashMap<[u8; 32], IssuerPublicConfig>,
}

impl InMemoryTrustStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the `[verifier]` config section.
    pub fn from_entries(entries: &[TrustedIssuerEntry]) -> Result<Self, CredentialError> {
        let store = Self::new();
        for entry in entries {
            store.upsert(IssuerPublicConfig::try_from(entry)?)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.issuers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issuers.is_empty()
    }
}

impl TrustStore for InMemoryTrustStore {
    fn upsert(&self, config: IssuerPublicConfig) -> Result<bool, CredentialError> {
        config.validate()?;
        let key = *config.public_key.as_bytes();
        let issuer_id = config.id.clone();
        let added = self.issuers.insert(key, config).is_none();
        tracing::info!(issuer = %issuer_id, added, "trusted issuer stored");
        Ok(added)
    }

    fn remove(&self, public_key: &PublicKey) -> bool {
        let removed = self.issuers.remove(public_key.as_bytes()).is_some();
        if removed {
            tracing::info!(public_key = %public_key, "trusted issuer removed");
        }
        removed
    }

    fn get(&self, public_key: &PublicKey) -> Option<IssuerPublicConfig> {
        self.issuers.get(public_key.as_bytes()).map(|e| e.value().clone())
    }

    fn list(&self) -> Vec<IssuerPublicConfig> {
        self.issuers.iter().map(|e| e.value().clone()).collect()
    }
}

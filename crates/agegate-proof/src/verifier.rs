use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use agegate_core::{VerifierConfig, MAX_AGE};
use agegate_credentials::{CredentialError, IssuerPublicConfig, TrustStore};
use agegate_crypto::{Hash, PublicKey};

use crate::age_proof::AgeProof;
use crate::system::{CertifiedRangeProofSystem, ProofSystem, Statement};

/// Why a proof was rejected.
///
/// Cryptographic failures carry no detail so callers cannot learn which
/// sub-check failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", content = "message", rename_all = "camelCase")]
pub enum VerificationError {
    #[error("{0}")]
    Structural(String),

    #[error("{0}")]
    Format(String),

    #[error("Issuer is not trusted")]
    Untrusted,

    #[error("Proof is too old (max {window})")]
    Stale { window: String },

    #[error("Cryptographic proof verification failed")]
    Cryptographic,
}

/// Outcome of [`Verifier::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub is_valid: bool,
    pub minimum_age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<VerificationError>,
    pub verified_at: DateTime<Utc>,
}

impl VerificationResult {
    fn valid(minimum_age: u32, verified_at: DateTime<Utc>) -> Self {
        Self {
            is_valid: true,
            minimum_age,
            error: None,
            verified_at,
        }
    }

    fn invalid(minimum_age: u32, error: VerificationError, verified_at: DateTime<Utc>) -> Self {
        Self {
            is_valid: false,
            minimum_age,
            error: Some(error),
            verified_at,
        }
    }

    /// Human-readable rejection reason.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}

fn describe_window(window: Duration) -> String {
    let secs = window.num_seconds();
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {}", unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };
    if secs > 0 && secs % 3600 == 0 {
        plural(secs / 3600, "hour")
    } else if secs > 0 && secs % 60 == 0 {
        plural(secs / 60, "minute")
    } else {
        plural(secs, "second")
    }
}

/// Relying-party side: checks proofs against a store of trusted issuers.
pub struct Verifier {
    trust_store: Arc<dyn TrustStore>,
    system: Arc<dyn ProofSystem>,
    max_proof_age: Duration,
    max_clock_skew: Duration,
}

impl Verifier {
    pub fn new(trust_store: Arc<dyn TrustStore>, config: &VerifierConfig) -> Self {
        let system = Arc::new(CertifiedRangeProofSystem::new(config.max_clock_skew()));
        Self::with_proof_system(trust_store, system, config)
    }

    pub fn with_proof_system(
        trust_store: Arc<dyn TrustStore>,
        system: Arc<dyn ProofSystem>,
        config: &VerifierConfig,
    ) -> Self {
        Self {
            trust_store,
            system,
            max_proof_age: config.max_proof_age(),
            max_clock_skew: config.max_clock_skew(),
        }
    }

    /// Trust `config.public_key`. Returns `true` if it was not trusted before.
    pub fn add_trusted_issuer(&self, config: IssuerPublicConfig) -> Result<bool, CredentialError> {
        self.trust_store.upsert(config)
    }

    pub fn remove_trusted_issuer(&self, public_key: &PublicKey) -> bool {
        self.trust_store.remove(public_key)
    }

    pub fn list_trusted_issuers(&self) -> Vec<IssuerPublicConfig> {
        self.trust_store.list()
    }

    /// Verify a raw JSON proof. Undecodable input is a structural failure.
    pub fn verify_json(&self, json: &str) -> VerificationResult {
        match serde_json::from_str::<AgeProof>(json) {
            Ok(proof) => self.verify(&proof),
            Err(e) => {
                tracing::debug!(error = %e, "proof rejected: undecodable");
                VerificationResult::invalid(
                    0,
                    VerificationError::Structural("Invalid proof data".into()),
                    Utc::now(),
                )
            }
        }
    }

    /// Verify a proof. Every failure is reported in the result, never as an error.
    pub fn verify(&self, proof: &AgeProof) -> VerificationResult {
        let verified_at = Utc::now();
        match self.check(proof, verified_at) {
            Ok(()) => {
                tracing::info!(minimum_age = proof.minimum_age, "age proof verified");
                VerificationResult::valid(proof.minimum_age, verified_at)
            }
            Err(error) => {
                tracing::debug!(
                    minimum_age = proof.minimum_age,
                    reason = %error,
                    "age proof rejected"
                );
                VerificationResult::invalid(proof.minimum_age, error, verified_at)
            }
        }
    }

    fn check(&self, proof: &AgeProof, now: DateTime<Utc>) -> Result<(), VerificationError> {
        let (proof_bytes, commitment) = self.check_structure(proof, now)?;

        let issuer_public_key = PublicKey::from_hex(&proof.public_inputs.issuer_public_key)
            .ok()
            .filter(|key| self.trust_store.contains(key))
            .ok_or(VerificationError::Untrusted)?;

        let verification_date = DateTime::parse_from_rfc3339(&proof.public_inputs.verification_date)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|_| VerificationError::Format("Invalid verification date".into()))?;

        if now - proof.generated_at > self.max_proof_age {
            return Err(VerificationError::Stale {
                window: describe_window(self.max_proof_age),
            });
        }

        let statement = Statement {
            commitment,
            minimum_age: proof.minimum_age,
            verification_date,
            issuer_public_key,
        };
        if !self.system.verify(&proof_bytes, &statement) {
            return Err(VerificationError::Cryptographic);
        }
        Ok(())
    }

    fn check_structure(
        &self,
        proof: &AgeProof,
        now: DateTime<Utc>,
    ) -> Result<(Vec<u8>, Hash), VerificationError> {
        let structural = |msg: &str| VerificationError::Structural(msg.to_string());

        let bytes = proof
            .proof_bytes()
            .ok()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| structural("Invalid proof data"))?;
        if proof.minimum_age > MAX_AGE as u32 {
            return Err(structural("Invalid minimum age"));
        }

        let inputs = &proof.public_inputs;
        if inputs.commitment.is_empty() {
            return Err(structural("Credential commitment is required"));
        }
        let commitment: Hash = hex::decode(&inputs.commitment)
            .ok()
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| structural("Invalid credential commitment"))?;
        if inputs.verification_date.is_empty() {
            return Err(structural("Verification date is required"));
        }
        if inputs.issuer_public_key.is_empty() {
            return Err(structural("Issuer public key is required"));
        }
        let latest = now.checked_add_signed(self.max_clock_skew);
        if latest.is_some_and(|latest| proof.generated_at > latest) {
            return Err(structural("Invalid proof generation timestamp"));
        }
        Ok((bytes, commitment))
    }
}

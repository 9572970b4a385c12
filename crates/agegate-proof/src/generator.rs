use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;

use agegate_core::Age;
use agegate_credentials::{Credential, SECONDS_PER_YEAR};
use agegate_crypto::{commit, BlindingFactor};

use crate::age_proof::{encode_proof, AgeProof, PublicInputs};
use crate::error::ProofError;
use crate::system::{CertifiedRangeProofSystem, ProofSystem, Statement, Witness};

/// Holder-side proof generation.
///
/// Stateless: spent certificates leave the credential itself, so any number
/// of generators can serve the same holder.
#[derive(Clone)]
pub struct ProofGenerator {
    system: Arc<dyn ProofSystem>,
}

impl Default for ProofGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProofGenerator {
    pub fn new() -> Self {
        Self::with_proof_system(Arc::new(CertifiedRangeProofSystem::default()))
    }

    pub fn with_proof_system(system: Arc<dyn ProofSystem>) -> Self {
        Self { system }
    }

    /// Prove `minimum_age` as of now.
    pub fn prove(&self, credential: &mut Credential, minimum_age: i64) -> Result<AgeProof, ProofError> {
        self.generate_proof(Some(credential), minimum_age, None)
    }

    /// Generate a proof that the credential holder is at least `minimum_age`
    /// at `verification_date` (default now).
    ///
    /// Every successful proof consumes one birth-date certificate from
    /// `credential`. Once the pool is empty this fails with
    /// [`ProofError::CertificatesExhausted`] until the issuer tops it up with
    /// `CredentialIssuer::refresh_certificates`. A failed attempt consumes
    /// nothing.
    pub fn generate_proof(
        &self,
        credential: Option<&mut Credential>,
        minimum_age: i64,
        verification_date: Option<DateTime<Utc>>,
    ) -> Result<AgeProof, ProofError> {
        let credential = credential.ok_or(ProofError::MissingCredential)?;
        let minimum_age = Age::new(minimum_age)
            .map_err(|_| ProofError::InvalidAge(minimum_age))?
            .value() as u32;
        check_credential(credential)?;

        let verification_date = verification_date.unwrap_or_else(Utc::now);
        let born = credential.birth_instant();
        if verification_date < born {
            return Err(ProofError::TemporalOrder);
        }
        if verification_date > credential.expires_at {
            return Err(ProofError::ExpiredCredential);
        }
        let lived = verification_date.timestamp() - born.timestamp();
        if lived < minimum_age as i64 * SECONDS_PER_YEAR {
            return Err(ProofError::AgeRequirementNotMet(minimum_age));
        }

        let Some(certificate) = credential.certificates.last() else {
            tracing::warn!(credential_id = %credential.id, "birth-date certificates exhausted");
            return Err(ProofError::CertificatesExhausted);
        };

        let blinding = BlindingFactor::random();
        let birth_iso = credential.birth_date.format("%Y-%m-%d").to_string();
        let statement = Statement {
            commitment: commit(birth_iso.as_bytes(), &blinding),
            minimum_age,
            verification_date,
            issuer_public_key: credential.issuer_public_key,
        };
        let witness = Witness {
            birth_date: credential.birth_date,
            certificate,
        };
        let proof = self.system.prove(&witness, &statement)?;
        credential.certificates.pop();

        tracing::debug!(
            credential_id = %credential.id,
            minimum_age,
            remaining = credential.certificates.len(),
            "age proof generated"
        );

        Ok(AgeProof {
            minimum_age,
            proof: encode_proof(&proof),
            public_inputs: PublicInputs {
                commitment: hex::encode(statement.commitment),
                verification_date: verification_date.to_rfc3339_opts(SecondsFormat::Millis, true),
                issuer_public_key: credential.issuer_public_key.to_hex(),
            },
            generated_at: Utc::now(),
        })
    }
}

fn check_credential(credential: &Credential) -> Result<(), ProofError> {
    if !credential.verify_signature() {
        return Err(ProofError::InvalidCredential(
            "issuer signature does not verify".into(),
        ));
    }
    let issuer = &credential.issuer_public_key;
    if !credential.certificates.iter().all(|c| c.verify(issuer)) {
        return Err(ProofError::InvalidCredential(
            "birth-date certificate not signed by issuer".into(),
        ));
    }
    Ok(())
}

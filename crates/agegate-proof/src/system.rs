//! The proof system behind [`AgeProof`](crate::AgeProof) bytes.
//!
//! [`CertifiedRangeProofSystem`] spends one issuer-signed birth-date
//! certificate `C_b = t_birth·G + r·H` per proof. Both sides derive
//! `C_s = (t_verify − minAge·Y)·G − C_b`, a commitment to the age surplus
//! `s = t_verify − t_birth − minAge·Y` under blinding `−r`, and the holder
//! proves `s ∈ [0, 2^48)`. `Y` is a 365.25-day year in seconds.
//!
//! Wire layout: `version (1) || C_b (32) || valid_until (4, days from CE,
//! big-endian) || certificate signature (64) || range proof`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use curve25519_dalek::ristretto::RistrettoPoint;

use agegate_credentials::{
    birth_instant, certificate_message, BirthDateCertificate, SECONDS_PER_YEAR,
};
use agegate_crypto::pedersen::generator_g;
use agegate_crypto::{
    scalar_from_i64, verify_signature, Hash, PedersenCommitment, PublicKey, RangeProof, Signature,
    RANGE_PROOF_LEN,
};

use crate::error::ProofError;

pub const PROOF_VERSION: u8 = 1;

const HEADER_LEN: usize = 1 + 32 + 4 + 64;

/// Encoded size of a certified range proof.
pub const CERTIFIED_PROOF_LEN: usize = HEADER_LEN + RANGE_PROOF_LEN;

/// Public statement: "the holder of a credential from `issuer_public_key` is at
/// least `minimum_age` at `verification_date`".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub commitment: Hash,
    pub minimum_age: u32,
    pub verification_date: DateTime<Utc>,
    pub issuer_public_key: PublicKey,
}

/// Holder secrets for one proof.
#[derive(Debug)]
pub struct Witness<'a> {
    pub birth_date: NaiveDate,
    pub certificate: &'a BirthDateCertificate,
}

/// Produces and checks the opaque proof bytes of an [`AgeProof`](crate::AgeProof).
pub trait ProofSystem: Send + Sync {
    fn prove(&self, witness: &Witness<'_>, statement: &Statement) -> Result<Vec<u8>, ProofError>;

    /// Returns `false` for any failure, never the reason.
    fn verify(&self, proof: &[u8], statement: &Statement) -> bool;
}

/// Range proof over an issuer-certified Pedersen commitment to the birth instant.
#[derive(Debug, Clone)]
pub struct CertifiedRangeProofSystem {
    max_clock_skew: Duration,
}

impl Default for CertifiedRangeProofSystem {
    fn default() -> Self {
        Self::new(Duration::seconds(300))
    }
}

/// Seconds the holder's age exceeds `minimum_age` at `verification_date`.
pub fn age_surplus(birth_date: NaiveDate, minimum_age: u32, verification_date: DateTime<Utc>) -> i64 {
    verification_date.timestamp()
        - birth_instant(birth_date).timestamp()
        - minimum_age as i64 * SECONDS_PER_YEAR
}

fn surplus_commitment(
    certificate: &PedersenCommitment,
    minimum_age: u32,
    verification_date: DateTime<Utc>,
) -> RistrettoPoint {
    let offset = verification_date.timestamp() - minimum_age as i64 * SECONDS_PER_YEAR;
    scalar_from_i64(offset) * generator_g() - certificate.point()
}

fn transcript(statement: &Statement, certificate: &[u8; 32], valid_until: NaiveDate) -> Vec<u8> {
    let mut context = Vec::with_capacity(1 + 32 + 4 + 8 + 32 + 32 + 4);
    context.push(PROOF_VERSION);
    context.extend_from_slice(&statement.commitment);
    context.extend_from_slice(&statement.minimum_age.to_be_bytes());
    context.extend_from_slice(&statement.verification_date.timestamp().to_be_bytes());
    context.extend_from_slice(statement.issuer_public_key.as_bytes());
    context.extend_from_slice(certificate);
    context.extend_from_slice(&valid_until.num_days_from_ce().to_be_bytes());
    context
}

struct Decoded {
    certificate: PedersenCommitment,
    valid_until: NaiveDate,
    signature: Signature,
    range_proof: RangeProof,
}

fn decode(bytes: &[u8]) -> Option<Decoded> {
    if bytes.len() != CERTIFIED_PROOF_LEN || bytes[0] != PROOF_VERSION {
        return None;
    }
    let certificate = PedersenCommitment::from_bytes(&bytes[1..33]).ok()?;
    let days = i32::from_be_bytes(bytes[33..37].try_into().ok()?);
    let valid_until = NaiveDate::from_num_days_from_ce_opt(days)?;
    let signature = Signature::from_bytes(&bytes[37..HEADER_LEN]).ok()?;
    let range_proof = RangeProof::from_bytes(&bytes[HEADER_LEN..]).ok()?;
    Some(Decoded {
        certificate,
        valid_until,
        signature,
        range_proof,
    })
}

impl CertifiedRangeProofSystem {
    pub fn new(max_clock_skew: Duration) -> Self {
        Self { max_clock_skew }
    }
}

impl ProofSystem for CertifiedRangeProofSystem {
    fn prove(&self, witness: &Witness<'_>, statement: &Statement) -> Result<Vec<u8>, ProofError> {
        let certificate = witness.certificate;
        if !certificate.opens_to(witness.birth_date) {
            return Err(ProofError::InvalidCredential(
                "certificate does not match birth date".into(),
            ));
        }

        let surplus = age_surplus(
            witness.birth_date,
            statement.minimum_age,
            statement.verification_date,
        );
        let surplus = u64::try_from(surplus)
            .map_err(|_| ProofError::AgeRequirementNotMet(statement.minimum_age))?;

        let cert_bytes = certificate.commitment.to_bytes();
        let context = transcript(statement, &cert_bytes, certificate.valid_until);
        let blinding = -certificate.opening.blinding();
        let range_proof = RangeProof::prove(surplus, &blinding, &context)?;

        let mut out = Vec::with_capacity(CERTIFIED_PROOF_LEN);
        out.push(PROOF_VERSION);
        out.extend_from_slice(&cert_bytes);
        out.extend_from_slice(&certificate.valid_until.num_days_from_ce().to_be_bytes());
        out.extend_from_slice(&certificate.signature.to_bytes());
        out.extend_from_slice(&range_proof.to_bytes());
        Ok(out)
    }

    fn verify(&self, proof: &[u8], statement: &Statement) -> bool {
        let Some(decoded) = decode(proof) else {
            return false;
        };

        let cert_bytes = decoded.certificate.to_bytes();
        let message = certificate_message(&cert_bytes, decoded.valid_until);
        if !verify_signature(&message, &decoded.signature, &statement.issuer_public_key) {
            return false;
        }
        if decoded.valid_until < statement.verification_date.date_naive() {
            return false;
        }
        let latest = Utc::now().checked_add_signed(self.max_clock_skew);
        if latest.is_some_and(|latest| statement.verification_date > latest) {
            return false;
        }

        let surplus = surplus_commitment(
            &decoded.certificate,
            statement.minimum_age,
            statement.verification_date,
        );
        let context = transcript(statement, &cert_bytes, decoded.valid_until);
        decoded.range_proof.verify(&surplus, &context)
    }
}

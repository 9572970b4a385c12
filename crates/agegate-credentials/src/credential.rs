use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use agegate_crypto::{verify_signature, PedersenCommitment, PublicKey, Scalar, Signature};

use crate::error::CredentialError;

/// Seconds in a 365.25-day year.
pub const SECONDS_PER_YEAR: i64 = 31_557_600;

const CERTIFICATE_DOMAIN: &[u8] = b"agegate birth-date certificate v1";

/// Midnight UTC on `date`.
pub fn birth_instant(date: NaiveDate) -> DateTime<Utc> {
    NaiveDateTime::new(date, NaiveTime::default()).and_utc()
}

/// Bytes an issuer signs for a birth-date certificate.
pub fn certificate_message(commitment: &[u8; 32], valid_until: NaiveDate) -> Vec<u8> {
    let mut message = Vec::with_capacity(CERTIFICATE_DOMAIN.len() + 36);
    message.extend_from_slice(CERTIFICATE_DOMAIN);
    message.extend_from_slice(commitment);
    message.extend_from_slice(&valid_until.num_days_from_ce().to_be_bytes());
    message
}

/// The holder's secret opening of a certificate commitment.
#[derive(Clone)]
pub struct CertificateOpening(Scalar);

impl CertificateOpening {
    pub fn new(blinding: Scalar) -> Self {
        Self(blinding)
    }

    pub fn blinding(&self) -> &Scalar {
        &self.0
    }
}

impl Drop for CertificateOpening {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for CertificateOpening {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CertificateOpening([redacted])")
    }
}

impl Serialize for CertificateOpening {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0.as_bytes()))
    }
}

impl<'de> Deserialize<'de> for CertificateOpening {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        agegate_crypto::pedersen::scalar_from_bytes(&bytes)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// Issuer-signed Pedersen commitment to the holder's birth instant.
///
/// Each certificate backs exactly one proof; presenting the same certificate
/// twice would let verifiers link the two proofs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthDateCertificate {
    pub commitment: PedersenCommitment,
    pub valid_until: NaiveDate,
    pub signature: Signature,
    pub opening: CertificateOpening,
}

impl BirthDateCertificate {
    /// Check the issuer signature over `(commitment, valid_until)`.
    pub fn verify(&self, issuer: &PublicKey) -> bool {
        let message = certificate_message(&self.commitment.to_bytes(), self.valid_until);
        verify_signature(&message, &self.signature, issuer)
    }

    /// Check that the opening matches `birth_date`.
    pub fn opens_to(&self, birth_date: NaiveDate) -> bool {
        let t_birth = agegate_crypto::scalar_from_i64(birth_instant(birth_date).timestamp());
        self.commitment.opens_to(&t_birth, self.opening.blinding())
    }

    /// Stable identifier of the certificate.
    pub fn fingerprint(&self) -> [u8; 32] {
        self.commitment.to_bytes()
    }
}

/// A signed age credential held by its subject.
///
/// `certificates` is the unspent pool: proof generation removes the
/// certificate it uses. The issuer signature does not cover the pool, so it
/// can shrink or be refreshed without re-signing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: String,
    pub birth_date: NaiveDate,
    pub issuer_public_key: PublicKey,
    pub issuer_signature: Signature,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub certificates: Vec<BirthDateCertificate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalCredential {
    id: String,
    birth_date: String,
    issuer_public_key: String,
    issued_at: String,
    expires_at: String,
}

/// Canonical JSON signed by the issuer.
pub(crate) fn canonical_bytes(
    id: &str,
    birth_date: NaiveDate,
    issuer_public_key: &PublicKey,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Result<Vec<u8>, CredentialError> {
    let canonical = CanonicalCredential {
        id: id.to_string(),
        birth_date: birth_date.format("%Y-%m-%d").to_string(),
        issuer_public_key: issuer_public_key.to_hex(),
        issued_at: issued_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        expires_at: expires_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
    };
    serde_json::to_vec(&canonical).map_err(|e| CredentialError::Serialization(e.to_string()))
}

impl Credential {
    /// The bytes covered by `issuer_signature`.
    pub fn signing_bytes(&self) -> Result<Vec<u8>, CredentialError> {
        canonical_bytes(
            &self.id,
            self.birth_date,
            &self.issuer_public_key,
            self.issued_at,
            self.expires_at,
        )
    }

    /// Re-check the issuer signature over the canonical fields.
    pub fn verify_signature(&self) -> bool {
        match self.signing_bytes() {
            Ok(bytes) => verify_signature(&bytes, &self.issuer_signature, &self.issuer_public_key),
            Err(_) => false,
        }
    }

    pub fn birth_instant(&self) -> DateTime<Utc> {
        birth_instant(self.birth_date)
    }

    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        at > self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whole 365.25-day years between birth and `at`.
    pub fn age_at(&self, at: DateTime<Utc>) -> i64 {
        (at - self.birth_instant()).num_seconds().div_euclid(SECONDS_PER_YEAR)
    }

    pub fn to_json(&self) -> Result<String, CredentialError> {
        serde_json::to_string_pretty(self).map_err(|e| CredentialError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CredentialError> {
        serde_json::from_str(json).map_err(|e| CredentialError::Serialization(e.to_string()))
    }
}

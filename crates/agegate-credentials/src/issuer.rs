use chrono::{DateTime, Months, NaiveDate, Utc};

use agegate_core::IssuanceConfig;
use agegate_crypto::{
    generate_secure_id, random_scalar, scalar_from_i64, sign, KeyPair, PedersenCommitment,
};

use crate::credential::{
    birth_instant, canonical_bytes, certificate_message, BirthDateCertificate, CertificateOpening,
    Credential, SECONDS_PER_YEAR,
};
use crate::error::CredentialError;
use crate::trust_store::IssuerPublicConfig;

/// Oldest accepted birth date, in 365.25-day years before now.
pub const MAX_CREDENTIAL_AGE_YEARS: i64 = 150;

/// Settings for a [`CredentialIssuer`].
#[derive(Debug)]
pub struct IssuerConfig {
    pub id: String,
    pub name: String,
    pub keypair: Option<KeyPair>,
    pub credential_validity_years: u32,
    pub certificate_batch_size: usize,
}

impl IssuerConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, keypair: KeyPair) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            keypair: Some(keypair),
            credential_validity_years: 5,
            certificate_batch_size: 16,
        }
    }

    /// Build from the `[issuer]` config section.
    pub fn from_settings(settings: &IssuanceConfig, keypair: Option<KeyPair>) -> Self {
        Self {
            id: settings.issuer_id.clone(),
            name: settings.issuer_name.clone(),
            keypair,
            credential_validity_years: settings.credential_validity_years,
            certificate_batch_size: settings.certificate_batch_size,
        }
    }

    pub fn with_validity_years(mut self, years: u32) -> Self {
        self.credential_validity_years = years;
        self
    }

    pub fn with_certificate_batch_size(mut self, size: usize) -> Self {
        self.certificate_batch_size = size;
        self
    }
}

/// Issues birth-date credentials signed by the issuer's keypair.
pub struct CredentialIssuer {
    id: String,
    name: String,
    keypair: KeyPair,
    validity_years: u32,
    batch_size: usize,
}

impl CredentialIssuer {
    /// Create an issuer. Fails without a signing key.
    pub fn new(config: IssuerConfig) -> Result<Self, CredentialError> {
        let keypair = config.keypair.ok_or_else(|| {
            CredentialError::Configuration(
                "issuer must have a private key to issue credentials".into(),
            )
        })?;
        if config.certificate_batch_size == 0 {
            return Err(CredentialError::Configuration(
                "certificate batch size must be at least 1".into(),
            ));
        }
        Ok(Self {
            id: config.id,
            name: config.name,
            keypair,
            validity_years: config.credential_validity_years,
            batch_size: config.certificate_batch_size,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Public half of the issuer identity. Never carries the signing key.
    pub fn public_config(&self) -> IssuerPublicConfig {
        IssuerPublicConfig {
            id: self.id.clone(),
            name: self.name.clone(),
            public_key: self.keypair.public_key(),
        }
    }

    /// Issue a credential expiring after the configured validity period.
    pub fn issue(&self, birth_date: NaiveDate) -> Result<Credential, CredentialError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_months(Months::new(self.validity_years.saturating_mul(12)))
            .ok_or_else(|| {
                CredentialError::InvalidInput("credential expiry is out of range".into())
            })?;
        self.issue_at(birth_date, now, expires_at)
    }

    /// Parse an ISO `YYYY-MM-DD` birth date and issue.
    pub fn issue_iso(&self, birth_date: &str) -> Result<Credential, CredentialError> {
        let date = NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d")
            .map_err(|_| CredentialError::InvalidInput("invalid date of birth".into()))?;
        self.issue(date)
    }

    /// Issue with an explicit expiry, which may already lie in the past.
    pub fn issue_with_expiration(
        &self,
        birth_date: NaiveDate,
        expires_at: DateTime<Utc>,
    ) -> Result<Credential, CredentialError> {
        self.issue_at(birth_date, Utc::now(), expires_at)
    }

    fn issue_at(
        &self,
        birth_date: NaiveDate,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Credential, CredentialError> {
        let born = birth_instant(birth_date);
        if born > now {
            return Err(CredentialError::InvalidInput(
                "date of birth cannot be in the future".into(),
            ));
        }
        if (now - born).num_seconds() > MAX_CREDENTIAL_AGE_YEARS * SECONDS_PER_YEAR {
            return Err(CredentialError::InvalidInput(
                "date of birth is too far in the past".into(),
            ));
        }

        let id = generate_secure_id();
        let issuer_public_key = self.keypair.public_key();
        let message = canonical_bytes(&id, birth_date, &issuer_public_key, now, expires_at)?;
        let issuer_signature = sign(&message, &self.keypair);
        let certificates = self.certificates(birth_date, expires_at.date_naive());

        tracing::info!(
            issuer = %self.id,
            credential_id = %id,
            expires = %expires_at,
            certificates = certificates.len(),
            "credential issued"
        );

        Ok(Credential {
            id,
            birth_date,
            issuer_public_key,
            issuer_signature,
            issued_at: now,
            expires_at,
            certificates,
        })
    }

    /// Top up a credential this issuer signed with a fresh certificate batch.
    ///
    /// Holders call this once their certificates run out. Returns the number
    /// of certificates added.
    pub fn refresh_certificates(&self, credential: &mut Credential) -> Result<usize, CredentialError> {
        if credential.issuer_public_key != self.keypair.public_key() {
            return Err(CredentialError::InvalidInput(
                "credential was issued by another issuer".into(),
            ));
        }
        if !credential.verify_signature() {
            return Err(CredentialError::InvalidInput(
                "credential signature does not verify".into(),
            ));
        }
        if credential.is_expired() {
            return Err(CredentialError::InvalidInput("credential has expired".into()));
        }

        let batch = self.certificates(credential.birth_date, credential.expires_at.date_naive());
        let added = batch.len();
        credential.certificates.extend(batch);

        tracing::info!(
            issuer = %self.id,
            credential_id = %credential.id,
            added,
            "certificates refreshed"
        );
        Ok(added)
    }

    fn certificates(&self, birth_date: NaiveDate, valid_until: NaiveDate) -> Vec<BirthDateCertificate> {
        let t_birth = scalar_from_i64(birth_instant(birth_date).timestamp());
        (0..self.batch_size)
            .map(|_| {
                let blinding = random_scalar();
                let commitment = PedersenCommitment::commit(&t_birth, &blinding);
                let signature = sign(
                    &certificate_message(&commitment.to_bytes(), valid_until),
                    &self.keypair,
                );
                BirthDateCertificate {
                    commitment,
                    valid_until,
                    signature,
                    opening: CertificateOpening::new(blinding),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_issuer() -> CredentialIssuer {
        let config = IssuerConfig::new("gov-issuer", "Government Identity Authority", KeyPair::generate())
            .with_certificate_batch_size(4);
        CredentialIssuer::new(config).unwrap()
    }

    fn years_ago(years: i64) -> NaiveDate {
        (Utc::now() - Duration::days(years * 366)).date_naive()
    }

    #[test]
    fn test_issue_credential() {
        let issuer = test_issuer();
        let birth = years_ago(25);
        let credential = issuer.issue(birth).unwrap();
        assert_eq!(credential.birth_date, birth);
        assert_eq!(credential.issuer_public_key, issuer.public_config().public_key);
        assert!(credential.verify_signature());
        assert!(credential.expires_at > credential.issued_at + Duration::days(4 * 365));
        assert_eq!(credential.certificates.len(), 4);
        assert!(credential.age_at(Utc::now()) >= 24);
    }

    #[test]
    fn test_issue_without_key_fails() {
        let config = IssuerConfig {
            keypair: None,
            ..IssuerConfig::new("x", "X", KeyPair::generate())
        };
        assert!(matches!(
            CredentialIssuer::new(config),
            Err(CredentialError::Configuration(_))
        ));
    }

    #[test]
    fn test_issue_future_birth_date() {
        let issuer = test_issuer();
        let tomorrow = (Utc::now() + Duration::days(2)).date_naive();
        assert!(matches!(
            issuer.issue(tomorrow),
            Err(CredentialError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_issue_too_old() {
        let issuer = test_issuer();
        assert!(matches!(
            issuer.issue(years_ago(151)),
            Err(CredentialError::InvalidInput(_))
        ));
        assert!(issuer.issue(years_ago(149)).is_ok());
    }

    #[test]
    fn test_issue_iso() {
        let issuer = test_issuer();
        let credential = issuer.issue_iso("1990-05-17").unwrap();
        assert_eq!(credential.birth_date, NaiveDate::from_ymd_opt(1990, 5, 17).unwrap());
        assert!(matches!(
            issuer.issue_iso("1990-02-30"),
            Err(CredentialError::InvalidInput(_))
        ));
        assert!(issuer.issue_iso("yesterday").is_err());
    }

    #[test]
    fn test_issue_already_expired() {
        let issuer = test_issuer();
        let credential = issuer
            .issue_with_expiration(years_ago(30), Utc::now() - Duration::days(1))
            .unwrap();
        assert!(credential.is_expired());
        assert!(credential.verify_signature());
    }

    #[test]
    fn test_certificates_are_signed_and_distinct() {
        let issuer = test_issuer();
        let credential = issuer.issue(years_ago(40)).unwrap();
        let key = issuer.public_config().public_key;
        for cert in &credential.certificates {
            assert!(cert.verify(&key));
            assert!(cert.opens_to(credential.birth_date));
            assert_eq!(cert.valid_until, credential.expires_at.date_naive());
        }
        let first = credential.certificates[0].fingerprint();
        assert!(credential.certificates[1..].iter().all(|c| c.fingerprint() != first));
    }

    #[test]
    fn test_tampered_credential_fails_signature() {
        let issuer = test_issuer();
        let mut credential = issuer.issue(years_ago(20)).unwrap();
        credential.birth_date = years_ago(30);
        assert!(!credential.verify_signature());
    }

    #[test]
    fn test_credential_json_roundtrip_keeps_signature() {
        let issuer = test_issuer();
        let credential = issuer.issue(years_ago(33)).unwrap();
        let json = credential.to_json().unwrap();
        assert!(json.contains("\"birthDate\""));
        let back = Credential::from_json(&json).unwrap();
        assert!(back.verify_signature());
        assert_eq!(back.certificates.len(), credential.certificates.len());
    }

    #[test]
    fn test_refresh_certificates() {
        let issuer = test_issuer();
        let mut credential = issuer.issue(years_ago(30)).unwrap();
        let before: Vec<_> = credential.certificates.iter().map(|c| c.fingerprint()).collect();
        credential.certificates.clear();

        assert_eq!(issuer.refresh_certificates(&mut credential).unwrap(), 4);
        assert_eq!(credential.certificates.len(), 4);
        assert!(credential.verify_signature());
        let key = issuer.public_config().public_key;
        for cert in &credential.certificates {
            assert!(cert.verify(&key));
            assert!(cert.opens_to(credential.birth_date));
            assert!(!before.contains(&cert.fingerprint()));
        }
    }

    #[test]
    fn test_refresh_rejects_foreign_tampered_or_expired() {
        let issuer = test_issuer();
        let mut foreign = test_issuer().issue(years_ago(30)).unwrap();
        assert!(matches!(
            issuer.refresh_certificates(&mut foreign),
            Err(CredentialError::InvalidInput(_))
        ));

        let mut tampered = issuer.issue(years_ago(15)).unwrap();
        tampered.birth_date = years_ago(40);
        assert!(issuer.refresh_certificates(&mut tampered).is_err());

        let mut expired = issuer
            .issue_with_expiration(years_ago(30), Utc::now() - Duration::days(1))
            .unwrap();
        assert!(issuer.refresh_certificates(&mut expired).is_err());
        assert_eq!(expired.certificates.len(), 4);
    }

    #[test]
    fn test_public_config_has_no_secret() {
        let kp = KeyPair::from_seed(&[7u8; 32]);
        let secret_hex = hex::encode(kp.secret_bytes());
        let issuer = CredentialIssuer::new(IssuerConfig::new("id", "Name", kp)).unwrap();
        let json = serde_json::to_string(&issuer.public_config()).unwrap();
        assert!(!json.contains(&secret_hex));
    }
}

//! Configuration loading and management.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// Upper bound for `verifier.max_clock_skew_secs` (one day).
pub const MAX_CLOCK_SKEW_SECS: u64 = 86_400;
/// Upper bound for `verifier.max_proof_age_secs` (30 days).
pub const MAX_PROOF_AGE_SECS: u64 = 30 * 86_400;
/// Upper bound for `records.validity_days` (100 years).
pub const MAX_RECORD_VALIDITY_DAYS: u32 = 36_525;

/// Full Agegate configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AgegateConfig {
    /// Credential issuance settings.
    #[serde(default)]
    pub issuer: IssuanceConfig,

    /// Proof verification settings.
    #[serde(default)]
    pub verifier: VerifierConfig,

    /// Verification record settings.
    #[serde(default)]
    pub records: RecordConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuanceConfig {
    /// Stable issuer identifier.
    #[serde(default = "default_issuer_id")]
    pub issuer_id: String,
    /// Human-readable issuer name.
    #[serde(default = "default_issuer_name")]
    pub issuer_name: String,
    /// Path to the hex-encoded signing key seed.
    #[serde(default)]
    pub key_path: Option<PathBuf>,
    /// Lifetime of issued credentials, in years.
    #[serde(default = "default_credential_validity_years")]
    pub credential_validity_years: u32,
    /// Birth-date certificates bundled per credential; one is spent per proof.
    #[serde(default = "default_certificate_batch_size")]
    pub certificate_batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Proofs generated longer ago than this are rejected.
    #[serde(default = "default_max_proof_age_secs")]
    pub max_proof_age_secs: u64,
    /// Tolerated clock drift for timestamps in the future.
    #[serde(default = "default_max_clock_skew_secs")]
    pub max_clock_skew_secs: u64,
    /// Issuers trusted at startup.
    #[serde(default)]
    pub trusted_issuers: Vec<TrustedIssuerEntry>,
}

/// A statically configured trusted issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedIssuerEntry {
    pub id: String,
    pub name: String,
    /// Hex-encoded Ed25519 public key.
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Lifetime of a verification record, in days.
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,
    /// Minimum age used when a caller does not specify one.
    #[serde(default = "default_minimum_age")]
    pub default_minimum_age: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_issuer_id() -> String {
    "agegate-issuer".into()
}
fn default_issuer_name() -> String {
    "Agegate Issuer".into()
}
fn default_credential_validity_years() -> u32 {
    5
}
fn default_certificate_batch_size() -> usize {
    16
}
fn default_max_proof_age_secs() -> u64 {
    3600
}
fn default_max_clock_skew_secs() -> u64 {
    300
}
fn default_validity_days() -> u32 {
    90
}
fn default_minimum_age() -> u8 {
    18
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            issuer_id: default_issuer_id(),
            issuer_name: default_issuer_name(),
            key_path: None,
            credential_validity_years: default_credential_validity_years(),
            certificate_batch_size: default_certificate_batch_size(),
        }
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_proof_age_secs: default_max_proof_age_secs(),
            max_clock_skew_secs: default_max_clock_skew_secs(),
            trusted_issuers: Vec::new(),
        }
    }
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            validity_days: default_validity_days(),
            default_minimum_age: default_minimum_age(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn seconds(secs: u64) -> Duration {
    Duration::seconds(secs.min(i64::MAX as u64 / 1000) as i64)
}

impl VerifierConfig {
    pub fn max_proof_age(&self) -> Duration {
        seconds(self.max_proof_age_secs)
    }

    pub fn max_clock_skew(&self) -> Duration {
        seconds(self.max_clock_skew_secs)
    }
}

impl RecordConfig {
    pub fn validity(&self) -> Duration {
        Duration::days(self.validity_days as i64)
    }
}

impl AgegateConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, CoreError> {
        let config: AgegateConfig =
            toml::from_str(contents).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::Config(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::write(path, contents)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.issuer.certificate_batch_size == 0 {
            return Err(CoreError::Config(
                "issuer.certificate_batch_size must be at least 1".into(),
            ));
        }
        if self.issuer.credential_validity_years == 0 {
            return Err(CoreError::Config(
                "issuer.credential_validity_years must be at least 1".into(),
            ));
        }
        if self.verifier.max_clock_skew_secs > MAX_CLOCK_SKEW_SECS {
            return Err(CoreError::Config(format!(
                "verifier.max_clock_skew_secs cannot exceed {}",
                MAX_CLOCK_SKEW_SECS
            )));
        }
        if self.verifier.max_proof_age_secs > MAX_PROOF_AGE_SECS {
            return Err(CoreError::Config(format!(
                "verifier.max_proof_age_secs cannot exceed {}",
                MAX_PROOF_AGE_SECS
            )));
        }
        if self.records.validity_days > MAX_RECORD_VALIDITY_DAYS {
            return Err(CoreError::Config(format!(
                "records.validity_days cannot exceed {}",
                MAX_RECORD_VALIDITY_DAYS
            )));
        }
        if self.records.default_minimum_age > crate::types::MAX_AGE {
            return Err(CoreError::Config(format!(
                "records.default_minimum_age cannot exceed {}",
                crate::types::MAX_AGE
            )));
        }
        for entry in &self.verifier.trusted_issuers {
            let valid_hex = entry.public_key.len() == 64
                && entry.public_key.chars().all(|c| c.is_ascii_hexdigit());
            if !valid_hex {
                return Err(CoreError::Config(format!(
                    "trusted issuer {} has a malformed public key",
                    entry.id
                )));
            }
        }
        Ok(())
    }
}

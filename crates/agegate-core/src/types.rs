use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Upper bound for any age or minimum-age threshold, in years.
pub const MAX_AGE: u8 = 150;

/// An age in whole years, `0..=150`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Age(u8);

impl Age {
    pub fn new(value: i64) -> Result<Self, CoreError> {
        if value < 0 {
            return Err(CoreError::ValidationError("age cannot be negative".into()));
        }
        if value > MAX_AGE as i64 {
            return Err(CoreError::ValidationError(format!(
                "age cannot exceed {} years",
                MAX_AGE
            )));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Whether this age reaches `legal_age` (18 in most jurisdictions).
    pub fn is_adult(&self, legal_age: u8) -> bool {
        self.0 >= legal_age
    }

    /// Whether this age satisfies a `minimum` requirement.
    pub fn satisfies(&self, minimum: Age) -> bool {
        self.0 >= minimum.0
    }
}

impl TryFrom<i64> for Age {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Age> for u8 {
    fn from(age: Age) -> Self {
        age.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a registered proof: its public commitment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProofHash(String);

impl ProofHash {
    /// Minimum accepted length.
    pub const MIN_LEN: usize = 10;

    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "proof hash must be a non-empty string".into(),
            ));
        }
        if value.len() < Self::MIN_LEN {
            return Err(CoreError::ValidationError(format!(
                "proof hash must be at least {} characters long",
                Self::MIN_LEN
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProofHash {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProofHash> for String {
    fn from(hash: ProofHash) -> Self {
        hash.0
    }
}

impl fmt::Display for ProofHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A point in time (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse an RFC 3339 timestamp.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| CoreError::ValidationError(format!("invalid timestamp: {}", e)))
    }

    pub fn value(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Whether `self + lifetime` lies in the past.
    pub fn is_expired(&self, lifetime: Duration) -> bool {
        Utc::now() > self.0 + lifetime
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

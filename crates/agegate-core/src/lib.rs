//! Agegate Core — value objects, the verification record lifecycle, and
//! configuration shared by every Agegate crate.

pub mod config;
pub mod error;
pub mod record;
pub mod record_state;
pub mod types;

pub use config::{
    AgegateConfig, IssuanceConfig, LoggingConfig, RecordConfig, TrustedIssuerEntry, VerifierConfig,
    MAX_CLOCK_SKEW_SECS, MAX_PROOF_AGE_SECS, MAX_RECORD_VALIDITY_DAYS,
};
pub use error::CoreError;
pub use record::VerificationRecord;
pub use record_state::{RecordEvent, RecordState, RecordStateMachine};
pub use types::{Age, ProofHash, Timestamp, MAX_AGE};

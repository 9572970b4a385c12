//! Agegate Proof — minimum-age proofs that reveal neither the birth date nor
//! the age, and cannot be linked to each other.
//!
//! - [`ProofGenerator`] turns a [`Credential`](agegate_credentials::Credential)
//!   into an [`AgeProof`]
//! - [`Verifier`] checks an [`AgeProof`] against trusted issuers
//! - [`ProofSystem`] is the seam for the cryptographic argument itself

pub mod age_proof;
pub mod error;
pub mod generator;
pub mod system;
pub mod verifier;

pub use age_proof::{AgeProof, PublicInputs};
pub use error::ProofError;
pub use generator::ProofGenerator;
pub use system::{CertifiedRangeProofSystem, ProofSystem, Statement, Witness};
pub use verifier::{VerificationError, VerificationResult, Verifier};

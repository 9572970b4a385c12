//! Agegate Crypto — hashing, commitments, Ed25519 signing, and the Pedersen
//! range proofs behind minimum-age statements.

pub mod blinding;
pub mod error;
pub mod hashing;
pub mod keys;
pub mod pedersen;
pub mod range_proof;
pub mod signing;

pub use blinding::{generate_secure_id, BlindingFactor};
pub use error::CryptoError;
pub use hashing::{commit, hash, verify_commitment, Hash};
pub use keys::{KeyPair, PublicKey};
pub use pedersen::{random_scalar, scalar_from_i64, PedersenCommitment};
pub use range_proof::{RangeProof, RANGE_BITS, RANGE_PROOF_LEN};
pub use signing::{sign, verify, verify_signature, Signature};

pub use curve25519_dalek::scalar::Scalar;

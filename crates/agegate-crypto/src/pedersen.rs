//! Pedersen commitments over the Ristretto group.
//!
//! `C = v·G + r·H`, where `G` is the Ristretto base point and `H` is derived
//! by hashing to the group, so nobody knows `log_G(H)`.

use std::sync::OnceLock;

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::hashing::derive_wide;

const GENERATOR_H_DOMAIN: &str = "agegate pedersen generator H v1";

/// Value generator `G`.
pub fn generator_g() -> RistrettoPoint {
    RISTRETTO_BASEPOINT_POINT
}

/// Blinding generator `H`.
pub fn generator_h() -> RistrettoPoint {
    static H: OnceLock<RistrettoPoint> = OnceLock::new();
    *H.get_or_init(|| {
        let uniform: [u8; 64] = derive_wide(GENERATOR_H_DOMAIN, &[]);
        RistrettoPoint::from_uniform_bytes(&uniform)
    })
}

/// Uniformly random scalar from OS entropy.
pub fn random_scalar() -> Scalar {
    let mut wide = [0u8; 64];
    OsRng.fill_bytes(&mut wide);
    let scalar = Scalar::from_bytes_mod_order_wide(&wide);
    wide.zeroize();
    scalar
}

/// Map a signed integer into the scalar field.
pub fn scalar_from_i64(value: i64) -> Scalar {
    if value >= 0 {
        Scalar::from(value as u64)
    } else {
        -Scalar::from(value.unsigned_abs())
    }
}

/// Parse a canonical 32-byte scalar encoding.
pub fn scalar_from_bytes(bytes: &[u8]) -> Result<Scalar, CryptoError> {
    let arr: [u8; 32] = bytes
        .try_into()
        .map_err(|_| CryptoError::MalformedProof(format!("scalar must be 32 bytes, got {}", bytes.len())))?;
    Option::<Scalar>::from(Scalar::from_canonical_bytes(arr))
        .ok_or_else(|| CryptoError::MalformedProof("non-canonical scalar".into()))
}

/// Parse a compressed Ristretto point.
pub fn point_from_bytes(bytes: &[u8]) -> Result<RistrettoPoint, CryptoError> {
    let arr: [u8; 32] = bytes
        .try_into()
        .map_err(|_| CryptoError::MalformedProof(format!("point must be 32 bytes, got {}", bytes.len())))?;
    CompressedRistretto(arr)
        .decompress()
        .ok_or_else(|| CryptoError::MalformedProof("invalid group element".into()))
}

/// A Pedersen commitment `v·G + r·H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PedersenCommitment(RistrettoPoint);

impl PedersenCommitment {
    /// Commit to `value` under `blinding`.
    pub fn commit(value: &Scalar, blinding: &Scalar) -> Self {
        Self(value * generator_g() + blinding * generator_h())
    }

    /// Wrap an already-computed group element.
    pub fn from_point(point: RistrettoPoint) -> Self {
        Self(point)
    }

    pub fn point(&self) -> RistrettoPoint {
        self.0
    }

    /// Compressed 32-byte encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.compress().to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        point_from_bytes(bytes).map(Self)
    }

    /// Check an opening.
    pub fn opens_to(&self, value: &Scalar, blinding: &Scalar) -> bool {
        *self == Self::commit(value, blinding)
    }
}

impl Serialize for PedersenCommitment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.to_bytes()))
    }
}

impl<'de> Deserialize<'de> for PedersenCommitment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

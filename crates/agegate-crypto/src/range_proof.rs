//! Non-interactive range proof for Pedersen commitments.
//!
//! The committed value is split into [`RANGE_BITS`] bits. Each bit gets its
//! own Pedersen commitment `C_i` and a Cramer–Damgård–Schoenmakers OR-proof
//! showing `C_i` opens to 0 or to 1. The verifier checks that the weighted sum
//! `Σ 2^i·C_i` equals the outer commitment. Challenges are Fiat–Shamir over
//! BLAKE3 and bound to a caller-supplied context, so a proof cannot be lifted
//! into a different statement.

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;

use crate::error::CryptoError;
use crate::hashing::derive_wide;
use crate::pedersen::{generator_g, generator_h, point_from_bytes, random_scalar, scalar_from_bytes};

/// Number of bits proven. Values must lie in `[0, 2^RANGE_BITS)`.
pub const RANGE_BITS: usize = 48;

const BIT_PROOF_LEN: usize = 32 * 5;

/// Encoded size of a [`RangeProof`].
pub const RANGE_PROOF_LEN: usize = RANGE_BITS * BIT_PROOF_LEN;

const CHALLENGE_DOMAIN: &str = "agegate range proof bit challenge v1";

#[derive(Debug, Clone)]
struct BitProof {
    commitment: RistrettoPoint,
    c0: Scalar,
    c1: Scalar,
    z0: Scalar,
    z1: Scalar,
}

/// Proof that a Pedersen commitment opens to a value in `[0, 2^RANGE_BITS)`.
#[derive(Debug, Clone)]
pub struct RangeProof {
    bits: Vec<BitProof>,
}

fn pow2(i: usize) -> Scalar {
    Scalar::from(1u64 << i)
}

fn bit_challenge(
    context: &[u8],
    index: usize,
    commitment: &RistrettoPoint,
    a0: &RistrettoPoint,
    a1: &RistrettoPoint,
) -> Scalar {
    let wide: [u8; 64] = derive_wide(
        CHALLENGE_DOMAIN,
        &[
            context,
            &(index as u32).to_le_bytes(),
            commitment.compress().as_bytes(),
            a0.compress().as_bytes(),
            a1.compress().as_bytes(),
        ],
    );
    Scalar::from_bytes_mod_order_wide(&wide)
}

impl RangeProof {
    /// Prove that `value·G + blinding·H` commits to a value in range.
    pub fn prove(value: u64, blinding: &Scalar, context: &[u8]) -> Result<Self, CryptoError> {
        if RANGE_BITS < 64 && value >> RANGE_BITS != 0 {
            return Err(CryptoError::OutOfRange(format!(
                "value does not fit in {} bits",
                RANGE_BITS
            )));
        }

        let g = generator_g();
        let h = generator_h();

        // Bit blindings must recombine to the outer blinding: r_0 absorbs the rest.
        let mut blindings: Vec<Scalar> = Vec::with_capacity(RANGE_BITS);
        blindings.push(Scalar::ZERO);
        for _ in 1..RANGE_BITS {
            blindings.push(random_scalar());
        }
        let weighted: Scalar = (1..RANGE_BITS).map(|i| pow2(i) * blindings[i]).sum();
        blindings[0] = blinding - weighted;

        let mut bits = Vec::with_capacity(RANGE_BITS);
        for (i, r) in blindings.iter().enumerate() {
            let bit = (value >> i) & 1;
            let commitment = Scalar::from(bit) * g + r * h;
            let p0 = commitment;
            let p1 = commitment - g;
            let k = random_scalar();

            let proof = if bit == 0 {
                let (c1, z1) = (random_scalar(), random_scalar());
                let a1 = z1 * h - c1 * p1;
                let a0 = k * h;
                let c = bit_challenge(context, i, &commitment, &a0, &a1);
                let c0 = c - c1;
                BitProof {
                    commitment,
                    c0,
                    c1,
                    z0: k + c0 * r,
                    z1,
                }
            } else {
                let (c0, z0) = (random_scalar(), random_scalar());
                let a0 = z0 * h - c0 * p0;
                let a1 = k * h;
                let c = bit_challenge(context, i, &commitment, &a0, &a1);
                let c1 = c - c0;
                BitProof {
                    commitment,
                    c0,
                    c1,
                    z0,
                    z1: k + c1 * r,
                }
            };
            bits.push(proof);
        }

        Ok(Self { bits })
    }

    /// Verify against the outer commitment and the same context used to prove.
    pub fn verify(&self, commitment: &RistrettoPoint, context: &[u8]) -> bool {
        if self.bits.len() != RANGE_BITS {
            tracing::debug!(bits = self.bits.len(), "range proof has wrong bit count");
            return false;
        }

        let g = generator_g();
        let h = generator_h();

        let mut recombined = RistrettoPoint::identity();
        for (i, bit) in self.bits.iter().enumerate() {
            recombined += pow2(i) * bit.commitment;
        }
        if recombined != *commitment {
            tracing::debug!("range proof bit commitments do not recombine");
            return false;
        }

        let failed = self.bits.iter().enumerate().position(|(i, bit)| {
            let p0 = bit.commitment;
            let p1 = bit.commitment - g;
            let a0 = bit.z0 * h - bit.c0 * p0;
            let a1 = bit.z1 * h - bit.c1 * p1;
            bit.c0 + bit.c1 != bit_challenge(context, i, &bit.commitment, &a0, &a1)
        });
        if let Some(bit) = failed {
            tracing::debug!(bit, "range proof bit challenge mismatch");
            return false;
        }
        true
    }

    /// Fixed-length encoding: per bit `C_i || c0 || c1 || z0 || z1`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(RANGE_PROOF_LEN);
        for bit in &self.bits {
            out.extend_from_slice(bit.commitment.compress().as_bytes());
            out.extend_from_slice(bit.c0.as_bytes());
            out.extend_from_slice(bit.c1.as_bytes());
            out.extend_from_slice(bit.z0.as_bytes());
            out.extend_from_slice(bit.z1.as_bytes());
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != RANGE_PROOF_LEN {
            return Err(CryptoError::MalformedProof(format!(
                "range proof must be {} bytes, got {}",
                RANGE_PROOF_LEN,
                bytes.len()
            )));
        }
        let bits = bytes
            .chunks_exact(BIT_PROOF_LEN)
            .map(|chunk| {
                Ok(BitProof {
                    commitment: point_from_bytes(&chunk[0..32])?,
                    c0: scalar_from_bytes(&chunk[32..64])?,
                    c1: scalar_from_bytes(&chunk[64..96])?,
                    z0: scalar_from_bytes(&chunk[96..128])?,
                    z1: scalar_from_bytes(&chunk[128..160])?,
                })
            })
            .collect::<Result<Vec<_>, CryptoError>>()?;
        Ok(Self { bits })
    }
}

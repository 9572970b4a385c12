use crate::blinding::BlindingFactor;

/// BLAKE3 hash (32 bytes).
pub type Hash = [u8; 32];

/// Hash arbitrary data using BLAKE3.
pub fn hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Create a BLAKE3 commitment: H(value || blinding_factor).
///
/// Hiding as long as the blinding factor stays secret and is never reused,
/// binding by collision resistance of BLAKE3.
pub fn commit(value: &[u8], blinding_factor: &BlindingFactor) -> Hash {
    let mut input = Vec::with_capacity(value.len() + 32);
    input.extend_from_slice(value);
    input.extend_from_slice(blinding_factor.as_bytes());
    hash(&input)
}

/// Verify a BLAKE3 commitment by recomputing H(value || blinding_factor).
pub fn verify_commitment(value: &[u8], blinding_factor: &BlindingFactor, commitment: &Hash) -> bool {
    commit(value, blinding_factor) == *commitment
}

/// Derive `N` bytes from a domain-separated BLAKE3 XOF over `parts`.
///
/// Each part is length-prefixed so that distinct part lists never collide.
pub(crate) fn derive_wide<const N: usize>(domain: &str, parts: &[&[u8]]) -> [u8; N] {
    let mut hasher = blake3::Hasher::new_derive_key(domain);
    for part in parts {
        hasher.update(&(part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    let mut out = [0u8; N];
    hasher.finalize_xof().fill(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let data = b"agegate test data";
        assert_eq!(hash(data), hash(data));
    }

    #[test]
    fn test_hash_different_inputs() {
        assert_ne!(hash(b"data A"), hash(b"data B"));
    }

    #[test]
    fn test_hash_empty() {
        let h = hash(b"");
        assert_ne!(h, [0u8; 32]);
    }

    #[test]
    fn test_commitment_roundtrip() {
        let value = b"1990-01-15";
        let factor = BlindingFactor::from_bytes([0xAB; 32]);
        let commitment = commit(value, &factor);
        assert!(verify_commitment(value, &factor, &commitment));
    }

    #[test]
    fn test_commitment_wrong_value() {
        let factor = BlindingFactor::from_bytes([0xCD; 32]);
        let commitment = commit(b"1990-01-15", &factor);
        assert!(!verify_commitment(b"1990-01-16", &factor, &commitment));
    }

    #[test]
    fn test_commitment_wrong_factor() {
        let commitment = commit(b"value", &BlindingFactor::from_bytes([0x01; 32]));
        assert!(!verify_commitment(
            b"value",
            &BlindingFactor::from_bytes([0x02; 32]),
            &commitment
        ));
    }

    #[test]
    fn test_commitment_fresh_factors_differ() {
        let c1 = commit(b"same-value", &BlindingFactor::random());
        let c2 = commit(b"same-value", &BlindingFactor::random());
        assert_ne!(c1, c2);
    }

    #[test]
    fn test_derive_wide_domain_separated() {
        let a: [u8; 64] = derive_wide("domain-a", &[b"x"]);
        let b: [u8; 64] = derive_wide("domain-b", &[b"x"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_derive_wide_length_prefixed() {
        let a: [u8; 32] = derive_wide("d", &[b"ab", b"c"]);
        let b: [u8; 32] = derive_wide("d", &[b"a", b"bc"]);
        assert_ne!(a, b);
    }
}

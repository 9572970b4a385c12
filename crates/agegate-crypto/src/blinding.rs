use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// 256-bit blinding factor for commitments.
///
/// Drawn from the OS entropy source, which is safe to call from any number
/// of threads at once. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct BlindingFactor([u8; 32]);

impl BlindingFactor {
    /// Draw a fresh, independent blinding factor.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap known bytes. Only meant for reproducing a commitment.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for BlindingFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BlindingFactor(<redacted>)")
    }
}

/// Generate a unique, time-ordered identifier (UUID v7).
pub fn generate_secure_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

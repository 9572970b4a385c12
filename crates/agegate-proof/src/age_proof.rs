use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProofError;

/// Values the verifier sees in the clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicInputs {
    /// Hex BLAKE3 commitment to the birth date under a fresh blinding factor.
    pub commitment: String,
    /// RFC 3339 instant the age statement is made for.
    pub verification_date: String,
    /// Hex Ed25519 key of the credential issuer.
    pub issuer_public_key: String,
}

/// A minimum-age proof as sent from holder to verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeProof {
    pub minimum_age: u32,
    /// Base64 proof bytes.
    pub proof: String,
    pub public_inputs: PublicInputs,
    pub generated_at: DateTime<Utc>,
}

impl AgeProof {
    pub fn proof_bytes(&self) -> Result<Vec<u8>, ProofError> {
        BASE64
            .decode(self.proof.as_bytes())
            .map_err(|e| ProofError::Serialization(format!("proof is not base64: {}", e)))
    }

    /// The public commitment, which also identifies the proof in records.
    pub fn proof_hash(&self) -> &str {
        &self.public_inputs.commitment
    }

    pub fn to_json(&self) -> Result<String, ProofError> {
        serde_json::to_string_pretty(self).map_err(|e| ProofError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, ProofError> {
        serde_json::from_str(json).map_err(|e| ProofError::Serialization(e.to_string()))
    }
}

pub(crate) fn encode_proof(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AgeProof {
        AgeProof {
            minimum_age: 18,
            proof: encode_proof(&[1, 2, 3]),
            public_inputs: PublicInputs {
                commitment: "ab".repeat(32),
                verification_date: "2025-03-01T12:00:00Z".into(),
                issuer_public_key: "cd".repeat(32),
            },
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["minimumAge"], 18);
        assert!(json["publicInputs"]["commitment"].is_string());
        assert!(json["publicInputs"]["verificationDate"].is_string());
        assert!(json["publicInputs"]["issuerPublicKey"].is_string());
        assert!(json["generatedAt"].is_string());
    }

    #[test]
    fn test_proof_bytes() {
        let proof = sample();
        assert_eq!(proof.proof_bytes().unwrap(), vec![1, 2, 3]);
        let broken = AgeProof {
            proof: "!!not base64!!".into(),
            ..sample()
        };
        assert!(broken.proof_bytes().is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let proof = sample();
        let back = AgeProof::from_json(&proof.to_json().unwrap()).unwrap();
        assert_eq!(back, proof);
        assert_eq!(back.proof_hash(), "ab".repeat(32));
    }

    #[test]
    fn test_negative_minimum_age_rejected_on_decode() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json["minimumAge"] = serde_json::json!(-1);
        assert!(serde_json::from_value::<AgeProof>(json).is_err());
    }
}

//! `agegate verify` — Verify a minimum-age proof.

use clap::Args;
use std::sync::Arc;

use agegate_core::AgegateConfig;
use agegate_credentials::{InMemoryTrustStore, IssuerPublicConfig};
use agegate_crypto::PublicKey;
use agegate_proof::Verifier;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Proof JSON (as string or path to file).
    #[arg(short, long)]
    pub proof: String,

    /// Additional trusted issuer public keys (hex), comma-separated.
    #[arg(short, long, value_delimiter = ',')]
    pub trust: Vec<String>,
}

pub fn run(args: &VerifyArgs, config: &AgegateConfig) -> anyhow::Result<()> {
    let json = super::read_json_arg(&args.proof)?;

    let store = InMemoryTrustStore::from_entries(&config.verifier.trusted_issuers)?;
    let verifier = Verifier::new(Arc::new(store), &config.verifier);
    for (i, key) in args.trust.iter().enumerate() {
        let public_key = PublicKey::from_hex(key.trim())
            .map_err(|e| anyhow::anyhow!("invalid --trust key {}: {}", key, e))?;
        verifier.add_trusted_issuer(IssuerPublicConfig {
            id: format!("cli-{}", i),
            name: "Trusted via command line".into(),
            public_key,
        })?;
    }
    if verifier.list_trusted_issuers().is_empty() {
        tracing::warn!("no trusted issuers configured; every proof will be rejected");
    }

    let result = verifier.verify_json(&json);
    println!("{}", serde_json::to_string_pretty(&result)?);
    match result.error_message() {
        None => Ok(()),
        Some(reason) => anyhow::bail!("proof rejected: {}", reason),
    }
}

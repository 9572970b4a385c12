//! `agegate refresh` — Top up a credential with fresh proof certificates.

use clap::Args;
use std::path::PathBuf;

use agegate_core::AgegateConfig;
use agegate_credentials::{Credential, CredentialIssuer, IssuerConfig};

use super::keygen::load_keypair;

#[derive(Args, Debug)]
pub struct RefreshArgs {
    /// Credential JSON file, rewritten in place.
    #[arg(long)]
    pub credential: PathBuf,

    /// Issuer key file (defaults to issuer.key_path from the config).
    #[arg(short, long)]
    pub key: Option<PathBuf>,
}

pub fn run(args: &RefreshArgs, config: &AgegateConfig) -> anyhow::Result<()> {
    let key_path = args
        .key
        .clone()
        .or_else(|| config.issuer.key_path.clone())
        .ok_or_else(|| anyhow::anyhow!("no issuer key: pass --key or set issuer.key_path"))?;
    let keypair = load_keypair(&key_path)?;
    let issuer = CredentialIssuer::new(IssuerConfig::from_settings(&config.issuer, Some(keypair)))?;

    let mut credential = Credential::from_json(&std::fs::read_to_string(&args.credential)?)?;
    let added = issuer.refresh_certificates(&mut credential)?;
    std::fs::write(&args.credential, credential.to_json()?)?;

    eprintln!(
        "Credential {} refreshed: {} certificates added, {} available",
        credential.id,
        added,
        credential.certificates.len()
    );
    Ok(())
}

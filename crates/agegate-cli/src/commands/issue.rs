//! `agegate issue` — Issue a birth-date credential.

use chrono::{DateTime, Utc};
use clap::Args;
use std::path::PathBuf;

use agegate_core::AgegateConfig;
use agegate_credentials::{CredentialIssuer, IssuerConfig};

use super::keygen::load_keypair;

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Birth date (YYYY-MM-DD).
    #[arg(short, long)]
    pub birth_date: String,

    /// Issuer key file (defaults to issuer.key_path from the config).
    #[arg(short, long)]
    pub key: Option<PathBuf>,

    /// Explicit expiry (RFC 3339) instead of the configured validity period.
    #[arg(long)]
    pub expires_at: Option<String>,

    /// Output file for the credential JSON (stdout if omitted).
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &IssueArgs, config: &AgegateConfig) -> anyhow::Result<()> {
    let key_path = args
        .key
        .clone()
        .or_else(|| config.issuer.key_path.clone())
        .ok_or_else(|| anyhow::anyhow!("no issuer key: pass --key or set issuer.key_path"))?;
    let keypair = load_keypair(&key_path)?;
    let issuer = CredentialIssuer::new(IssuerConfig::from_settings(&config.issuer, Some(keypair)))?;

    let credential = match &args.expires_at {
        Some(expires_at) => {
            let expires_at = DateTime::parse_from_rfc3339(expires_at)
                .map_err(|e| anyhow::anyhow!("invalid --expires-at: {}", e))?
                .with_timezone(&Utc);
            let birth_date = args
                .birth_date
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid date of birth: {}", args.birth_date))?;
            issuer.issue_with_expiration(birth_date, expires_at)?
        }
        None => issuer.issue_iso(&args.birth_date)?,
    };

    eprintln!(
        "Credential {} issued by {} ({} proof certificates, expires {})",
        credential.id,
        issuer.id(),
        credential.certificates.len(),
        credential.expires_at
    );
    super::write_output(args.out.as_deref(), &credential.to_json()?)
}

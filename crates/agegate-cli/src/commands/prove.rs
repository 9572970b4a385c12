//! `agegate prove` — Generate a minimum-age proof from a credential.

use chrono::{DateTime, Utc};
use clap::Args;
use std::path::PathBuf;

use agegate_core::AgegateConfig;
use agegate_credentials::Credential;
use agegate_proof::ProofGenerator;

#[derive(Args, Debug)]
pub struct ProveArgs {
    /// Credential JSON file. Spent certificates are removed from it.
    #[arg(long)]
    pub credential: PathBuf,

    /// Minimum age to prove (defaults to records.default_minimum_age).
    #[arg(short, long)]
    pub min_age: Option<i64>,

    /// Instant the statement is made for (RFC 3339, default now).
    #[arg(long)]
    pub verification_date: Option<String>,

    /// Output file for the proof JSON (stdout if omitted).
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &ProveArgs, config: &AgegateConfig) -> anyhow::Result<()> {
    let mut credential = Credential::from_json(&std::fs::read_to_string(&args.credential)?)?;
    let min_age = args
        .min_age
        .unwrap_or(config.records.default_minimum_age as i64);
    let verification_date = args
        .verification_date
        .as_deref()
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|e| anyhow::anyhow!("invalid --verification-date: {}", e))
        })
        .transpose()?;

    let proof =
        ProofGenerator::new().generate_proof(Some(&mut credential), min_age, verification_date)?;

    // The spent certificate is gone from `credential`; persist that.
    std::fs::write(&args.credential, credential.to_json()?)?;
    eprintln!(
        "Proof generated for minimum age {} ({} certificates left)",
        proof.minimum_age,
        credential.certificates.len()
    );

    super::write_output(args.out.as_deref(), &proof.to_json()?)
}

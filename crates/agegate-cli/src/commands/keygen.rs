//! `agegate keygen` — Generate an issuer signing key.

use clap::Args;
use std::path::PathBuf;
use zeroize::Zeroizing;

use agegate_crypto::KeyPair;

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// File to write the hex-encoded secret key to.
    #[arg(short, long, default_value = "issuer.key")]
    pub out: PathBuf,

    /// Overwrite an existing key file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &KeygenArgs) -> anyhow::Result<()> {
    if args.out.exists() && !args.force {
        anyhow::bail!("{} already exists (use --force to overwrite)", args.out.display());
    }
    let keypair = KeyPair::generate();
    let secret = Zeroizing::new(hex::encode(keypair.secret_bytes()));
    std::fs::write(&args.out, secret.as_bytes())?;
    tracing::info!(path = %args.out.display(), "issuer key written");

    println!("Public key: {}", keypair.public_key());
    println!("Add it to [[verifier.trusted_issuers]] on every verifier that should accept this issuer.");
    Ok(())
}

/// Load a hex-encoded secret key file.
pub fn load_keypair(path: &std::path::Path) -> anyhow::Result<KeyPair> {
    let contents = Zeroizing::new(std::fs::read_to_string(path)?);
    KeyPair::from_hex(contents.trim())
        .map_err(|e| anyhow::anyhow!("invalid key file {}: {}", path.display(), e))
}

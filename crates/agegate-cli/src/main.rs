//! Agegate CLI — issue age credentials, generate and verify minimum-age proofs.
//!
//! Subcommands: init, keygen, issue, refresh, prove, verify.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use agegate_core::{AgegateConfig, LoggingConfig};

/// Agegate — privacy-preserving minimum-age proofs.
#[derive(Parser, Debug)]
#[command(name = "agegate", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "agegate.toml")]
    config: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Generate an issuer signing key.
    Keygen(commands::keygen::KeygenArgs),
    /// Issue a birth-date credential.
    Issue(commands::issue::IssueArgs),
    /// Add fresh proof certificates to a credential.
    Refresh(commands::refresh::RefreshArgs),
    /// Generate a minimum-age proof from a credential.
    Prove(commands::prove::ProveArgs),
    /// Verify a minimum-age proof.
    Verify(commands::verify::VerifyArgs),
}

fn init_tracing(logging: &LoggingConfig, override_level: Option<&str>) {
    let level = override_level.unwrap_or(&logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AgegateConfig::load(&cli.config)?;
    init_tracing(&config.logging, cli.log_level.as_deref());

    match &cli.command {
        Commands::Init(args) => commands::init::run(args, &cli.config),
        Commands::Keygen(args) => commands::keygen::run(args),
        Commands::Issue(args) => commands::issue::run(args, &config),
        Commands::Refresh(args) => commands::refresh::run(args, &config),
        Commands::Prove(args) => commands::prove::run(args, &config),
        Commands::Verify(args) => commands::verify::run(args, &config),
    }
}

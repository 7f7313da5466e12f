//! # certreg CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use certreg_cli::hash::{run_hash, HashArgs};
use certreg_cli::keys::{run_address, run_keygen, AddressArgs, KeygenArgs};
use certreg_cli::signing::{run_recover, run_sign, RecoverArgs, SignArgs};

/// Certificate registry operator tooling.
///
/// Generates institution keys, fingerprints certificate documents, and
/// produces or checks the issuance signatures the registry verifies.
#[derive(Parser, Debug)]
#[command(name = "certreg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a secp256k1 key pair.
    Keygen(KeygenArgs),

    /// Print the account address of a private key file.
    Address(AddressArgs),

    /// Keccak-256 a certificate document into a certificate hash.
    Hash(HashArgs),

    /// Sign the issuance binding of a recipient and a certificate hash.
    Sign(SignArgs),

    /// Recover the signer of an issuance signature.
    Recover(RecoverArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Keygen(args) => run_keygen(&args),
        Commands::Address(args) => run_address(&args),
        Commands::Hash(args) => run_hash(&args),
        Commands::Sign(args) => run_sign(&args),
        Commands::Recover(args) => run_recover(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

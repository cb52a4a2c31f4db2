//! Developer entry point for effect sequences.
//!
//! Run with: `cargo run -p effect-cli -- <command>`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Check, Run};

/// Resolve effect sequences into render descriptors
#[derive(Parser)]
#[command(name = "effect-cli")]
#[command(about = "Resolve effect sequences into render descriptors", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Finalize every effect of a sequence file and print descriptors as JSON lines
    Run(Run),

    /// Parse and validate a sequence file without finalizing it
    Check(Check),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for EFFECT_* overrides and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(cmd) => cmd.execute().await,
        Command::Check(cmd) => cmd.execute(),
    }
}

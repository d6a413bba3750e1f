// Pillbox — Application Entry Point
//
// Parses CLI arguments, initializes structured logging, and dispatches to
// the command handler. Preimages are never logged at any level.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pillbox::cli::{execute, Cli};

#[tokio::main]
async fn main() {
    // RUST_LOG=pillbox=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pillbox=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

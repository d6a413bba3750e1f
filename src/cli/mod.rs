// Pillbox — CLI Module
//
// Command-line host for the credential store using clap derive macros.
// Subcommands: add, get, list, token.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::execute;

/// Pillbox — keeps the L402 credentials you paid for.
#[derive(Parser, Debug)]
#[command(name = "pillbox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Data directory holding pillbox.db (default: $PILLBOX_HOME or ~/.pillbox).
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Seconds to wait on the store before giving up (default: 10).
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a new credential.
    Add {
        /// Human-readable label.
        #[arg(long)]
        label: String,

        /// URL of the paid resource.
        #[arg(long)]
        location: String,

        /// Request method used against the resource (POST, GET, PUT, DELETE).
        #[arg(long, default_value = "GET")]
        method: String,

        /// Hex-encoded macaroon from the 402 challenge.
        #[arg(long)]
        macaroon: String,

        /// Hex-encoded preimage proving payment of the invoice.
        #[arg(long)]
        preimage: String,

        /// The Lightning invoice that was paid.
        #[arg(long)]
        invoice: String,

        /// Kind of resource (file, graphql).
        #[arg(long = "type", default_value = "file")]
        kind: String,
    },

    /// Show a single credential.
    Get {
        /// Numeric credential ID.
        id: u64,
    },

    /// List all stored credentials.
    List,

    /// Print the L402 Authorization header for a credential.
    Token {
        /// Numeric credential ID.
        id: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_with_defaults() {
        let cli = Cli::try_parse_from([
            "pillbox", "add", "--label", "API", "--location", "https://x/y",
            "--macaroon", "ab12", "--preimage", "cd34", "--invoice", "lnbc1",
        ])
        .unwrap();

        match cli.command {
            Commands::Add { method, kind, label, .. } => {
                assert_eq!(label, "API");
                assert_eq!(method, "GET");
                assert_eq!(kind, "file");
            }
            other => panic!("Expected Add, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pillbox", "get", "3", "--home", "/tmp/pb", "--timeout-secs", "2",
        ])
        .unwrap();

        assert_eq!(cli.home, Some(PathBuf::from("/tmp/pb")));
        assert_eq!(cli.timeout_secs, Some(2));
        assert!(matches!(cli.command, Commands::Get { id: 3 }));
    }

    #[test]
    fn test_parse_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["pillbox", "get", "abc"]).is_err());
    }
}

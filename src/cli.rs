//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "merkl-claim")]
#[command(about = "Claim Merkl distributor rewards from the command line", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ./merkl-claim.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode claim call data without touching the network
    Encode {
        /// Recipient address
        #[arg(short, long)]
        user: String,

        /// Amount, decimal or 0x-prefixed hex, in the token's smallest unit
        #[arg(short, long)]
        amount: String,

        /// Merkle proof elements in leaf-to-root order
        #[arg(short, long = "proof", num_args = 0..)]
        proofs: Vec<String>,

        /// Token address (defaults to the configured token)
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Decode claim call data
    Decode {
        /// 0x-prefixed call data
        data: String,
    },

    /// Show the claimable reward for an address
    Rewards {
        /// Address to look up
        #[arg(short, long)]
        user: String,
    },

    /// Fetch the claimable reward and claim it
    Claim {
        /// Private key of the claiming account
        #[arg(short = 'k', long, env = "PRIVATE_KEY", hide_env_values = true)]
        private_key: String,

        /// Print the transaction instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
}

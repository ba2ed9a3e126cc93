use clap::{Parser, Subcommand};
use kii_storage_core::Address;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "kii-storage", version, about = "Owner-gated private info storage")]
pub struct Cli {
    /// Snapshot file holding the store state.
    #[arg(long, global = true, default_value = "kii-storage.json")]
    pub state: PathBuf,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Print Prometheus metrics after the command.
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new store from a deployment config and write its snapshot.
    Deploy {
        #[arg(long)]
        config: PathBuf,
        /// Replace an existing snapshot.
        #[arg(long)]
        force: bool,
    },
    /// Resolve the caller's role.
    Authenticate {
        #[arg(long)]
        caller: Address,
    },
    /// List whitelisted addresses, owner first.
    Whitelist,
    /// Whitelist a new address (owner only).
    AddAddress {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        address: Address,
    },
    /// Read the private info (owner or whitelisted users).
    Get {
        #[arg(long)]
        caller: Address,
    },
    /// Replace the private info (owner only).
    Set {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        value: String,
    },
}

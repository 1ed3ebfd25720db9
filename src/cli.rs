//! Command line interface for the `ledger-bdd` binary.
//!
//! The binary lists the configured account fixtures so a fixture file can be
//! checked before a suite run.

use std::path::PathBuf;

use clap::Parser;

/// Command line arguments for the `ledger-bdd` binary.
#[derive(Debug, Parser)]
#[command(
    name = "ledger-bdd",
    version,
    about = "Inspect the account fixtures used by the ledger scenarios"
)]
pub struct Cli {
    /// Fixture file to read; defaults to `$LEDGER_BDD_ACCOUNTS` or the
    /// bundled test fixtures.
    #[arg(short, long)]
    pub accounts: Option<PathBuf>,
}

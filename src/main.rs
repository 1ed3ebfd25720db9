//! Lists the configured account fixtures.
//!
//! Prints each fixture's index, account id and public key, failing on the
//! first malformed entry.

mod cli;

use clap::Parser;
use ledger_bdd::Fixtures;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    let fixtures = match cli.accounts {
        Some(path) => Fixtures::load(path)?,
        None => Fixtures::from_env()?,
    };
    tracing::info!(accounts = fixtures.len(), "loaded account fixtures");
    for index in 0..fixtures.len() {
        let (account_id, key) = fixtures.credentials(index)?;
        println!("{index}\t{account_id}\t{}", key.public_key());
    }
    Ok(())
}

//! Step definitions for the ledger scenarios.
//!
//! Steps stay thin: each delegates to a [`crate::world::LedgerWorld`] method
//! and routes the outcome through [`ledger_bdd::harness::logged`] so failures
//! are logged before cucumber reports them.

mod consensus_steps;
mod token_steps;
mod transfer_steps;

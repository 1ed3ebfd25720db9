//! Public API for the `ledger-bdd` library.
//!
//! This crate provides the client surface that the behavioural test suite
//! drives: typed transactions and queries for the consensus (topic) and token
//! services, the [`Network`] seam they are submitted through, an in-memory
//! network double for running scenarios offline, and the per-scenario
//! bookkeeping helpers used by the step definitions.

pub mod client;
pub mod config;
pub mod error;
pub mod harness;
pub mod hbar;
pub mod id;
pub mod key;
pub mod network;
pub mod query;
pub mod status;
pub mod transaction;

#[cfg(test)]
mod test_util;

pub use client::{BackoffConfig, Client, ClientConfig, ClientError, Operator};
pub use config::{AccountFixture, ConfigError, Fixtures};
pub use error::{LedgerError, Result};
pub use hbar::Hbar;
pub use id::{AccountId, IdError, Timestamp, TokenId, TopicId, TransactionId};
pub use key::{Key, KeyError, KeyList, PrivateKey, PublicKey};
pub use network::{InMemoryNetwork, Network};
pub use query::{
    AccountBalance,
    AccountBalanceQuery,
    AccountInfo,
    AccountInfoQuery,
    TokenInfo,
    TokenInfoQuery,
    TopicInfo,
    TopicInfoQuery,
    TopicMessage,
    TopicMessageQuery,
    TransactionRecordQuery,
};
pub use status::Status;
pub use transaction::{
    FrozenTransaction,
    TokenAssociateTransaction,
    TokenCreateTransaction,
    TokenMintTransaction,
    TokenSupplyType,
    TopicCreateTransaction,
    TopicMessageSubmitTransaction,
    TransactionReceipt,
    TransactionRecord,
    TransactionResponse,
    TransferTransaction,
};

//! The seam between the client and a ledger.
//!
//! [`Network`] is everything the step definitions need from a ledger SDK:
//! submit a signed transaction, learn its outcome, read account, token and
//! topic state, and follow a topic. [`InMemoryNetwork`] implements it offline
//! so scenarios run without a live network.

mod memory;

use std::fmt;

use async_trait::async_trait;
pub use memory::{FeeSchedule, InMemoryNetwork, InMemoryNetworkBuilder};
use tokio::sync::broadcast;

use crate::{
    error::Result,
    id::{AccountId, Timestamp, TokenId, TopicId, TransactionId},
    query::{AccountBalance, AccountInfo, TokenInfo, TopicInfo, TopicMessage},
    transaction::{SignedTransaction, TransactionReceipt, TransactionRecord},
};

/// A topic's history at subscription time plus the feed of later messages.
///
/// `live` is registered before `backlog` is captured, so a message is in
/// one or both; consumers drop live messages already seen in the backlog.
#[derive(Debug)]
pub struct TopicSubscription {
    pub backlog: Vec<TopicMessage>,
    pub live: broadcast::Receiver<TopicMessage>,
}

/// A ledger that accepts transactions and answers queries.
#[async_trait]
pub trait Network: Send + Sync + fmt::Debug {
    /// Submit a signed transaction.
    ///
    /// Returns once the transaction is accepted for consensus; its outcome
    /// is read from [`Network::receipt`].
    async fn submit(&self, transaction: SignedTransaction) -> Result<()>;

    /// The receipt of a submitted transaction, or `None` while it is still
    /// pending.
    async fn receipt(&self, transaction_id: &TransactionId) -> Result<Option<TransactionReceipt>>;

    /// The record of a transaction, or `None` while pending or unknown.
    async fn record(&self, transaction_id: &TransactionId) -> Result<Option<TransactionRecord>>;

    async fn account_balance(&self, account_id: &AccountId) -> Result<AccountBalance>;

    async fn account_info(&self, account_id: &AccountId) -> Result<AccountInfo>;

    async fn token_info(&self, token_id: &TokenId) -> Result<TokenInfo>;

    async fn topic_info(&self, topic_id: &TopicId) -> Result<TopicInfo>;

    /// Follow a topic from `start_time`.
    async fn subscribe_topic(&self, topic_id: &TopicId, start_time: Timestamp) -> Result<TopicSubscription>;
}

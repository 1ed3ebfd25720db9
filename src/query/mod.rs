//! Read-only queries against ledger state.
//!
//! Queries are free in this crate; each one is a builder whose `execute`
//! forwards a single request to the client's network.

mod topic_message;

use std::{collections::BTreeMap, time::Duration};

pub use topic_message::{TopicMessage, TopicMessageQuery};

use crate::{
    client::{Client, ClientError},
    error::{LedgerError, Result},
    hbar::Hbar,
    id::{AccountId, TokenId, TopicId, TransactionId},
    key::Key,
    status::Status,
    transaction::{TokenSupplyType, TransactionRecord},
};

/// Balances held by an account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountBalance {
    pub account_id: AccountId,
    pub hbars: Hbar,
    /// Balances of associated tokens, in the token's smallest unit.
    pub tokens: BTreeMap<TokenId, u64>,
}

impl AccountBalance {
    /// Balance of `token_id`, zero when the account does not hold it.
    #[must_use]
    pub fn token(&self, token_id: &TokenId) -> u64 { self.tokens.get(token_id).copied().unwrap_or(0) }
}

/// Account details.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_id: AccountId,
    pub key: Key,
    pub balance: Hbar,
    pub associated_tokens: Vec<TokenId>,
}

/// Token details.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenInfo {
    pub token_id: TokenId,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub total_supply: u64,
    pub treasury_account_id: AccountId,
    pub admin_key: Option<Key>,
    pub supply_key: Option<Key>,
    pub supply_type: TokenSupplyType,
    pub max_supply: u64,
}

/// Topic details.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicInfo {
    pub topic_id: TopicId,
    pub topic_memo: String,
    /// Number of messages published so far.
    pub sequence_number: u64,
    pub running_hash: Vec<u8>,
    pub admin_key: Option<Key>,
    pub submit_key: Option<Key>,
    pub auto_renew_account_id: Option<AccountId>,
    pub auto_renew_period: Duration,
}

/// Fetches an account's hbar and token balances.
#[derive(Clone, Debug, Default)]
pub struct AccountBalanceQuery {
    account_id: Option<AccountId>,
}

impl AccountBalanceQuery {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// # Errors
    ///
    /// Returns [`ClientError::MissingField`] without an account id and
    /// [`LedgerError::Query`] for unknown accounts.
    pub async fn execute(&self, client: &Client) -> Result<AccountBalance> {
        let account_id = self.account_id.ok_or(ClientError::MissingField("account_id"))?;
        client.network().account_balance(&account_id).await
    }
}

/// Fetches an account's key, balance and token associations.
#[derive(Clone, Debug, Default)]
pub struct AccountInfoQuery {
    account_id: Option<AccountId>,
}

impl AccountInfoQuery {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// # Errors
    ///
    /// Returns [`ClientError::MissingField`] without an account id and
    /// [`LedgerError::Query`] for unknown accounts.
    pub async fn execute(&self, client: &Client) -> Result<AccountInfo> {
        let account_id = self.account_id.ok_or(ClientError::MissingField("account_id"))?;
        client.network().account_info(&account_id).await
    }
}

/// Fetches a token's metadata and supply.
#[derive(Clone, Debug, Default)]
pub struct TokenInfoQuery {
    token_id: Option<TokenId>,
}

impl TokenInfoQuery {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn token_id(mut self, token_id: TokenId) -> Self {
        self.token_id = Some(token_id);
        self
    }

    /// # Errors
    ///
    /// Returns [`ClientError::MissingField`] without a token id and
    /// [`LedgerError::Query`] for unknown tokens.
    pub async fn execute(&self, client: &Client) -> Result<TokenInfo> {
        let token_id = self.token_id.ok_or(ClientError::MissingField("token_id"))?;
        client.network().token_info(&token_id).await
    }
}

/// Fetches a topic's metadata.
#[derive(Clone, Debug, Default)]
pub struct TopicInfoQuery {
    topic_id: Option<TopicId>,
}

impl TopicInfoQuery {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn topic_id(mut self, topic_id: TopicId) -> Self {
        self.topic_id = Some(topic_id);
        self
    }

    /// # Errors
    ///
    /// Returns [`ClientError::MissingField`] without a topic id and
    /// [`LedgerError::Query`] for unknown topics.
    pub async fn execute(&self, client: &Client) -> Result<TopicInfo> {
        let topic_id = self.topic_id.ok_or(ClientError::MissingField("topic_id"))?;
        client.network().topic_info(&topic_id).await
    }
}

/// Fetches the record of a transaction that reached consensus.
#[derive(Clone, Debug, Default)]
pub struct TransactionRecordQuery {
    transaction_id: Option<TransactionId>,
}

impl TransactionRecordQuery {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn transaction_id(mut self, transaction_id: TransactionId) -> Self {
        self.transaction_id = Some(transaction_id);
        self
    }

    /// # Errors
    ///
    /// Returns [`ClientError::MissingField`] without a transaction id and
    /// `RECORD_NOT_FOUND` while the transaction has not reached consensus.
    pub async fn execute(&self, client: &Client) -> Result<TransactionRecord> {
        let transaction_id = self
            .transaction_id
            .ok_or(ClientError::MissingField("transaction_id"))?;
        client
            .network()
            .record(&transaction_id)
            .await?
            .ok_or(LedgerError::Query(Status::RecordNotFound))
    }
}

//! An offline ledger for running scenarios without a live network.
//!
//! Transactions are applied in submission order under a single lock, so
//! consensus order is submission order. Receipts can be held back by a
//! configurable consensus delay to exercise receipt polling.

mod fees;
mod ledger;

use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use dashmap::DashMap;
pub use fees::FeeSchedule;
use tokio::time::Instant;
use tracing::{info, warn};

use self::ledger::Ledger;
use super::{Network, TopicSubscription};
use crate::{
    config::{ConfigError, Fixtures},
    error::{LedgerError, Result},
    hbar::Hbar,
    id::{AccountId, Timestamp, TokenId, TopicId, TransactionId},
    key::{Key, PublicKey},
    query::{AccountBalance, AccountInfo, TokenInfo, TopicInfo},
    status::Status,
    transaction::{SignedTransaction, TransactionBody, TransactionReceipt, TransactionRecord},
};

#[derive(Debug)]
struct StoredRecord {
    record: TransactionRecord,
    visible_at: Instant,
}

/// A single-node ledger held in memory.
#[derive(Debug)]
pub struct InMemoryNetwork {
    ledger: Mutex<Ledger>,
    records: DashMap<TransactionId, StoredRecord>,
    fees: FeeSchedule,
    consensus_delay: Duration,
}

/// Builder for [`InMemoryNetwork`].
#[derive(Debug, Default)]
pub struct InMemoryNetworkBuilder {
    accounts: Vec<(AccountId, Key, Hbar)>,
    fees: FeeSchedule,
    consensus_delay: Duration,
}

impl InMemoryNetworkBuilder {
    /// Add a genesis account.
    #[must_use]
    pub fn account(mut self, account_id: AccountId, key: impl Into<Key>, balance: Hbar) -> Self {
        self.accounts.push((account_id, key.into(), balance));
        self
    }

    #[must_use]
    pub fn fee_schedule(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    /// Hold receipts back for `delay` after submission.
    #[must_use]
    pub fn consensus_delay(mut self, delay: Duration) -> Self {
        self.consensus_delay = delay;
        self
    }

    #[must_use]
    pub fn build(self) -> InMemoryNetwork {
        InMemoryNetwork {
            ledger: Mutex::new(Ledger::new(self.accounts)),
            records: DashMap::new(),
            fees: self.fees,
            consensus_delay: self.consensus_delay,
        }
    }
}

impl InMemoryNetwork {
    #[must_use]
    pub fn builder() -> InMemoryNetworkBuilder { InMemoryNetworkBuilder::default() }

    /// A network whose genesis accounts are the configured fixtures.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a fixture is malformed.
    pub fn from_fixtures(fixtures: &Fixtures) -> std::result::Result<Self, ConfigError> {
        Self::builder_from_fixtures(fixtures).map(InMemoryNetworkBuilder::build)
    }

    /// A builder preloaded with the configured fixtures.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a fixture is malformed.
    pub fn builder_from_fixtures(fixtures: &Fixtures) -> std::result::Result<InMemoryNetworkBuilder, ConfigError> {
        (0..fixtures.len()).try_fold(Self::builder(), |builder, index| {
            let (account_id, key) = fixtures.credentials(index)?;
            let balance = fixtures.genesis_balance(index)?;
            Ok(builder.account(account_id, key.public_key(), balance))
        })
    }

    #[must_use]
    pub fn fee_schedule(&self) -> &FeeSchedule { &self.fees }

    fn ledger(&self) -> MutexGuard<'_, Ledger> { self.ledger.lock().unwrap_or_else(PoisonError::into_inner) }
}

fn verify_signatures(transaction: &SignedTransaction) -> Option<HashSet<PublicKey>> {
    transaction
        .signatures
        .iter()
        .map(|pair| {
            pair.public_key
                .verify(&transaction.body_bytes, &pair.signature)
                .then_some(pair.public_key)
        })
        .collect()
}

#[async_trait]
impl Network for InMemoryNetwork {
    async fn submit(&self, transaction: SignedTransaction) -> Result<()> {
        let body = TransactionBody::from_bytes(&transaction.body_bytes)
            .map_err(|_| LedgerError::Query(Status::InvalidTransactionBody))?;
        let transaction_id = body.transaction_id;
        let precheck = |status: Status| LedgerError::Precheck {
            transaction_id,
            status,
        };
        let signers = verify_signatures(&transaction).ok_or_else(|| precheck(Status::InvalidSignature))?;

        let mut ledger = self.ledger();
        if self.records.contains_key(&transaction_id) {
            return Err(precheck(Status::DuplicateTransaction));
        }
        let record = ledger
            .process(&body, &signers, &self.fees)
            .inspect_err(|status| warn!(%transaction_id, %status, "transaction failed precheck"))
            .map_err(precheck)?;
        info!(
            %transaction_id,
            kind = %body.data.kind(),
            status = %record.receipt.status,
            fee = %record.transaction_fee,
            "transaction reached consensus"
        );
        self.records.insert(transaction_id, StoredRecord {
            record,
            visible_at: Instant::now() + self.consensus_delay,
        });
        Ok(())
    }

    async fn receipt(&self, transaction_id: &TransactionId) -> Result<Option<TransactionReceipt>> {
        let stored = self
            .records
            .get(transaction_id)
            .ok_or(LedgerError::Query(Status::ReceiptNotFound))?;
        Ok((Instant::now() >= stored.visible_at).then(|| stored.record.receipt.clone()))
    }

    async fn record(&self, transaction_id: &TransactionId) -> Result<Option<TransactionRecord>> {
        Ok(self
            .records
            .get(transaction_id)
            .filter(|stored| Instant::now() >= stored.visible_at)
            .map(|stored| stored.record.clone()))
    }

    async fn account_balance(&self, account_id: &AccountId) -> Result<AccountBalance> {
        self.ledger().account_balance(account_id).map_err(LedgerError::Query)
    }

    async fn account_info(&self, account_id: &AccountId) -> Result<AccountInfo> {
        self.ledger().account_info(account_id).map_err(LedgerError::Query)
    }

    async fn token_info(&self, token_id: &TokenId) -> Result<TokenInfo> {
        self.ledger().token_info(token_id).map_err(LedgerError::Query)
    }

    async fn topic_info(&self, topic_id: &TopicId) -> Result<TopicInfo> {
        self.ledger().topic_info(topic_id).map_err(LedgerError::Query)
    }

    async fn subscribe_topic(&self, topic_id: &TopicId, start_time: Timestamp) -> Result<TopicSubscription> {
        let (backlog, live) = self
            .ledger()
            .subscribe(topic_id, start_time)
            .map_err(LedgerError::Query)?;
        Ok(TopicSubscription { backlog, live })
    }
}

#[cfg(test)]
mod tests;

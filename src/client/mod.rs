//! The client facade requests are issued through.
//!
//! A [`Client`] binds a [`Network`] to an optional operator: the account that
//! pays for, and by default signs, the transactions it freezes. Cloning a
//! client is cheap and shares the underlying network.

mod config;
mod error;

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

pub use config::{BackoffConfig, ClientConfig};
pub use error::ClientError;
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::{
    error::{LedgerError, Result},
    id::{AccountId, Timestamp, TransactionId},
    key::PrivateKey,
    network::Network,
    transaction::TransactionReceipt,
};

/// The paying account of a client.
#[derive(Clone, Debug)]
pub struct Operator {
    pub account_id: AccountId,
    pub key: PrivateKey,
}

/// Handle used to execute transactions and queries against a [`Network`].
#[derive(Clone, Debug)]
pub struct Client {
    network: Arc<dyn Network>,
    operator: Option<Operator>,
    config: ClientConfig,
    last_valid_start: Arc<AtomicU64>,
}

impl Client {
    /// A client for `network` with no operator.
    #[must_use]
    pub fn for_network(network: Arc<dyn Network>) -> Self {
        Self {
            network,
            operator: None,
            config: ClientConfig::default(),
            last_valid_start: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Replace the client configuration.
    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the account that pays for and signs transactions.
    pub fn set_operator(&mut self, account_id: AccountId, key: PrivateKey) -> &mut Self {
        self.operator = Some(Operator { account_id, key });
        self
    }

    #[must_use]
    pub fn operator(&self) -> Option<&Operator> { self.operator.as_ref() }

    #[must_use]
    pub fn operator_account_id(&self) -> Option<AccountId> { self.operator.as_ref().map(|op| op.account_id) }

    #[must_use]
    pub fn config(&self) -> &ClientConfig { &self.config }

    pub(crate) fn network(&self) -> &dyn Network { self.network.as_ref() }

    /// A fresh transaction id paid for by the operator.
    ///
    /// Valid-start instants issued by one client (and its clones) strictly
    /// increase, so ids never collide even within the clock's resolution.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::OperatorNotSet`] when no operator is set.
    pub fn generate_transaction_id(&self) -> Result<TransactionId> {
        let account_id = self.operator_account_id().ok_or(ClientError::OperatorNotSet)?;
        let now = Timestamp::now().as_nanos();
        let previous = self
            .last_valid_start
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| Some(now.max(last + 1)))
            .unwrap_or_else(|last| last);
        let valid_start = Timestamp::from_nanos(now.max(previous + 1));
        Ok(TransactionId::new(account_id, valid_start))
    }

    /// Poll until the network knows the outcome of `transaction_id`.
    ///
    /// The last poll happens at the deadline itself.
    pub(crate) async fn poll_receipt(&self, transaction_id: &TransactionId) -> Result<TransactionReceipt> {
        let timeout = self.config.receipt_timeout;
        let deadline = Instant::now() + timeout;
        let backoff = self.config.backoff.normalized();
        let mut delay = backoff.initial_delay;
        loop {
            if let Some(receipt) = self.network.receipt(transaction_id).await? {
                return Ok(receipt);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(LedgerError::ReceiptTimeout {
                    transaction_id: *transaction_id,
                    timeout,
                });
            }
            let pause = delay.min(deadline - now);
            debug!(%transaction_id, ?pause, "receipt not yet available");
            sleep(pause).await;
            delay = (delay * 2).min(backoff.max_delay);
        }
    }
}

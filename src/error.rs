//! Canonical error and result types for ledger operations.
//!
//! [`LedgerError`] is the single surface returned by transactions, queries and
//! the [`crate::Network`] seam. Ledger-level rejections carry the [`Status`]
//! the network reported so callers can match on the specific failure.

use std::time::Duration;

use thiserror::Error;

use crate::{client::ClientError, id::TransactionId, key::KeyError, status::Status};

/// Top-level error type exposed by `ledger-bdd`.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The network refused the transaction before it reached consensus.
    #[error("transaction {transaction_id} failed precheck with status {status}")]
    Precheck {
        /// Identifier of the rejected transaction.
        transaction_id: TransactionId,
        /// Status reported by the network.
        status: Status,
    },
    /// The transaction reached consensus but did not succeed.
    #[error("receipt for transaction {transaction_id} contained error status {status}")]
    ReceiptStatus {
        /// Identifier of the failed transaction.
        transaction_id: TransactionId,
        /// Status recorded in the receipt.
        status: Status,
    },
    /// A query or malformed request was answered with a non-success status.
    #[error("request failed with status {0}")]
    Query(Status),
    /// No receipt became available before the configured deadline.
    #[error("timed out after {timeout:?} waiting for the receipt of {transaction_id}")]
    ReceiptTimeout {
        /// Identifier of the transaction being polled.
        transaction_id: TransactionId,
        /// The deadline that elapsed.
        timeout: Duration,
    },
    /// No matching topic message arrived before the deadline.
    #[error("timed out after {0:?} waiting for a matching topic message")]
    SubscriptionTimeout(Duration),
    /// The topic stream ended before a matching message arrived.
    #[error("topic subscription closed before a matching message arrived")]
    SubscriptionClosed,
    /// Client-side misuse such as a missing operator or field.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// Key material could not be parsed or combined.
    #[error(transparent)]
    Key(#[from] KeyError),
    /// The transaction body could not be encoded for signing.
    #[error("failed to encode transaction body")]
    Encode(#[source] bincode::error::EncodeError),
}

impl LedgerError {
    /// The ledger status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Precheck { status, .. } | Self::ReceiptStatus { status, .. } => Some(*status),
            Self::Query(status) => Some(*status),
            _ => None,
        }
    }
}

/// Canonical result alias used by `ledger-bdd` public APIs.
pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccountId, id::Timestamp};

    #[test]
    fn status_is_exposed_for_ledger_rejections() {
        let transaction_id = TransactionId::new(AccountId::new(0, 0, 1001), Timestamp::from_nanos(1));
        let err = LedgerError::ReceiptStatus {
            transaction_id,
            status: Status::TokenHasNoSupplyKey,
        };
        assert_eq!(err.status(), Some(Status::TokenHasNoSupplyKey));
        assert!(err.to_string().contains("TOKEN_HAS_NO_SUPPLY_KEY"));
        assert_eq!(LedgerError::SubscriptionClosed.status(), None);
    }
}

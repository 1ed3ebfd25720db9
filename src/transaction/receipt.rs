//! Consensus outcomes.

use super::{HbarTransfer, TokenTransfer};
use crate::{
    hbar::Hbar,
    id::{Timestamp, TokenId, TopicId, TransactionId},
    status::Status,
};

/// Confirmation that a transaction reached consensus, with its outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_id: TransactionId,
    pub status: Status,
    /// Set by token creation.
    pub token_id: Option<TokenId>,
    /// Set by topic creation.
    pub topic_id: Option<TopicId>,
    /// Set by message submission.
    pub topic_sequence_number: u64,
    /// Set by message submission.
    pub topic_running_hash: Option<Vec<u8>>,
    /// Supply after a mint.
    pub total_supply: u64,
}

impl TransactionReceipt {
    /// A receipt carrying only an outcome.
    #[must_use]
    pub fn new(transaction_id: TransactionId, status: Status) -> Self {
        Self {
            transaction_id,
            status,
            token_id: None,
            topic_id: None,
            topic_sequence_number: 0,
            topic_running_hash: None,
            total_supply: 0,
        }
    }
}

/// Full account of a transaction's effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRecord {
    pub receipt: TransactionReceipt,
    pub transaction_id: TransactionId,
    pub consensus_timestamp: Timestamp,
    /// Fee charged to the payer.
    pub transaction_fee: Hbar,
    pub transaction_memo: String,
    /// Net hbar movements, excluding the fee.
    pub hbar_transfers: Vec<HbarTransfer>,
    /// Net token movements.
    pub token_transfers: Vec<TokenTransfer>,
}

//! Ledger response codes.
//!
//! Statuses render in the network's `SCREAMING_SNAKE_CASE` form so log lines
//! and assertion messages match what operators see on the ledger itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome code attached to prechecks, receipts and query answers.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Success,
    InvalidSignature,
    InvalidAccountId,
    InvalidTokenId,
    InvalidTopicId,
    InvalidTransactionBody,
    DuplicateTransaction,
    InsufficientTxFee,
    InsufficientPayerBalance,
    InsufficientAccountBalance,
    InsufficientTokenBalance,
    InvalidAccountAmounts,
    TransfersNotZeroSumForToken,
    TokenHasNoSupplyKey,
    TokenMaxSupplyReached,
    InvalidTokenMaxSupply,
    InvalidTokenInitialSupply,
    InvalidTokenMintAmount,
    TokenAlreadyAssociatedToAccount,
    TokenNotAssociatedToAccount,
    MissingTokenName,
    MissingTokenSymbol,
    InvalidTopicMessage,
    MessageSizeTooLarge,
    ReceiptNotFound,
    RecordNotFound,
    Unknown,
}

impl Status {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::InvalidAccountId => "INVALID_ACCOUNT_ID",
            Self::InvalidTokenId => "INVALID_TOKEN_ID",
            Self::InvalidTopicId => "INVALID_TOPIC_ID",
            Self::InvalidTransactionBody => "INVALID_TRANSACTION_BODY",
            Self::DuplicateTransaction => "DUPLICATE_TRANSACTION",
            Self::InsufficientTxFee => "INSUFFICIENT_TX_FEE",
            Self::InsufficientPayerBalance => "INSUFFICIENT_PAYER_BALANCE",
            Self::InsufficientAccountBalance => "INSUFFICIENT_ACCOUNT_BALANCE",
            Self::InsufficientTokenBalance => "INSUFFICIENT_TOKEN_BALANCE",
            Self::InvalidAccountAmounts => "INVALID_ACCOUNT_AMOUNTS",
            Self::TransfersNotZeroSumForToken => "TRANSFERS_NOT_ZERO_SUM_FOR_TOKEN",
            Self::TokenHasNoSupplyKey => "TOKEN_HAS_NO_SUPPLY_KEY",
            Self::TokenMaxSupplyReached => "TOKEN_MAX_SUPPLY_REACHED",
            Self::InvalidTokenMaxSupply => "INVALID_TOKEN_MAX_SUPPLY",
            Self::InvalidTokenInitialSupply => "INVALID_TOKEN_INITIAL_SUPPLY",
            Self::InvalidTokenMintAmount => "INVALID_TOKEN_MINT_AMOUNT",
            Self::TokenAlreadyAssociatedToAccount => "TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT",
            Self::TokenNotAssociatedToAccount => "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT",
            Self::MissingTokenName => "MISSING_TOKEN_NAME",
            Self::MissingTokenSymbol => "MISSING_TOKEN_SYMBOL",
            Self::InvalidTopicMessage => "INVALID_TOPIC_MESSAGE",
            Self::MessageSizeTooLarge => "MESSAGE_SIZE_TOO_LARGE",
            Self::ReceiptNotFound => "RECEIPT_NOT_FOUND",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns `true` for [`Status::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool { matches!(self, Self::Success) }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

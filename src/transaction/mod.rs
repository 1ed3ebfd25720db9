//! Ledger transactions and their lifecycle.
//!
//! Every transaction follows the same typestate path:
//!
//! ```text
//! XxxTransaction::new() ─freeze_with─▶ FrozenTransaction ─sign*─▶ execute ─▶ TransactionResponse
//!                                                                          └─▶ get_receipt / get_record
//! ```
//!
//! Freezing fixes the body (payer, fee ceiling, memo and kind-specific data)
//! and encodes it once; signatures cover those bytes.

mod receipt;
mod token;
mod topic;
mod transfer;

use std::fmt;

use ed25519_dalek::Signature;
pub use receipt::{TransactionReceipt, TransactionRecord};
use serde::{Deserialize, Serialize};
pub use token::{TokenAssociateData, TokenCreateData, TokenMintData, TokenSupplyType};
pub use topic::{DEFAULT_AUTO_RENEW_PERIOD, TopicCreateData, TopicMessageSubmitData};
use tracing::info;
pub use transfer::{HbarTransfer, TokenTransfer, TransferData};

use crate::{
    client::{Client, ClientError},
    error::{LedgerError, Result},
    hbar::Hbar,
    id::TransactionId,
    key::{PrivateKey, PublicKey},
};

/// Creates a consensus topic.
pub type TopicCreateTransaction = Transaction<TopicCreateData>;
/// Publishes a message to a consensus topic.
pub type TopicMessageSubmitTransaction = Transaction<TopicMessageSubmitData>;
/// Creates a fungible token.
pub type TokenCreateTransaction = Transaction<TokenCreateData>;
/// Mints additional supply of a token.
pub type TokenMintTransaction = Transaction<TokenMintData>;
/// Associates tokens with an account.
pub type TokenAssociateTransaction = Transaction<TokenAssociateData>;
/// Moves hbars and tokens between accounts.
pub type TransferTransaction = Transaction<TransferData>;

/// Kind-specific payload of a transaction body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionData {
    TopicCreate(TopicCreateData),
    TopicMessageSubmit(TopicMessageSubmitData),
    TokenCreate(TokenCreateData),
    TokenMint(TokenMintData),
    TokenAssociate(TokenAssociateData),
    Transfer(TransferData),
}

impl TransactionData {
    #[must_use]
    pub fn kind(&self) -> TransactionKind {
        match self {
            Self::TopicCreate(_) => TransactionKind::TopicCreate,
            Self::TopicMessageSubmit(_) => TransactionKind::TopicMessageSubmit,
            Self::TokenCreate(_) => TransactionKind::TokenCreate,
            Self::TokenMint(_) => TransactionKind::TokenMint,
            Self::TokenAssociate(_) => TransactionKind::TokenAssociate,
            Self::Transfer(_) => TransactionKind::Transfer,
        }
    }
}

/// Discriminant of [`TransactionData`], used for fees and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    TopicCreate,
    TopicMessageSubmit,
    TokenCreate,
    TokenMint,
    TokenAssociate,
    Transfer,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TopicCreate => "ConsensusCreateTopic",
            Self::TopicMessageSubmit => "ConsensusSubmitMessage",
            Self::TokenCreate => "TokenCreate",
            Self::TokenMint => "TokenMint",
            Self::TokenAssociate => "TokenAssociateToAccount",
            Self::Transfer => "CryptoTransfer",
        })
    }
}

/// The signed portion of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    pub transaction_id: TransactionId,
    pub max_transaction_fee: Hbar,
    pub memo: String,
    pub data: TransactionData,
}

impl TransactionBody {
    /// Canonical encoding that signatures are computed over.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Encode`] if the body cannot be encoded.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serde::encode_to_vec(self, bincode::config::standard()).map_err(LedgerError::Encode)
    }

    /// Decode a body produced by [`TransactionBody::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns the decode error for malformed or truncated input.
    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, bincode::error::DecodeError> {
        bincode::serde::decode_from_slice(bytes, bincode::config::standard()).map(|(body, _)| body)
    }
}

/// A signature over a frozen body.
#[derive(Clone, Debug)]
pub struct SignaturePair {
    pub public_key: PublicKey,
    pub signature: Signature,
}

/// What is handed to the network on submission.
#[derive(Clone, Debug)]
pub struct SignedTransaction {
    pub body_bytes: Vec<u8>,
    pub signatures: Vec<SignaturePair>,
}

/// Kind-specific payload accepted by [`Transaction`].
pub trait TransactionKindData: Into<TransactionData> {
    /// Reject bodies missing fields the ledger cannot default.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingField`] naming the first missing field.
    fn validate(&self) -> std::result::Result<(), ClientError> { Ok(()) }
}

/// A transaction under construction.
#[derive(Clone, Debug, Default)]
pub struct Transaction<D> {
    data: D,
    memo: String,
    max_transaction_fee: Option<Hbar>,
}

impl<D: Default> Transaction<D> {
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl<D: TransactionKindData> Transaction<D> {
    /// Free-form memo recorded with the transaction.
    #[must_use]
    pub fn transaction_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Highest fee the payer is willing to be charged.
    #[must_use]
    pub fn max_transaction_fee(mut self, fee: Hbar) -> Self {
        self.max_transaction_fee = Some(fee);
        self
    }

    #[must_use]
    pub fn data(&self) -> &D { &self.data }

    /// Fix the body, assigning a transaction id paid for by the client's
    /// operator.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::OperatorNotSet`] when the client has no
    /// operator, [`ClientError::MissingField`] when a required field is unset,
    /// or [`LedgerError::Encode`] if the body cannot be encoded.
    pub fn freeze_with(self, client: &Client) -> Result<FrozenTransaction> {
        self.data.validate()?;
        let body = TransactionBody {
            transaction_id: client.generate_transaction_id()?,
            max_transaction_fee: self
                .max_transaction_fee
                .unwrap_or(client.config().max_transaction_fee),
            memo: self.memo,
            data: self.data.into(),
        };
        FrozenTransaction::new(body)
    }
}

/// A transaction whose body can no longer change.
#[derive(Clone, Debug)]
pub struct FrozenTransaction {
    body: TransactionBody,
    body_bytes: Vec<u8>,
    signatures: Vec<SignaturePair>,
}

impl FrozenTransaction {
    fn new(body: TransactionBody) -> Result<Self> {
        let body_bytes = body.to_bytes()?;
        Ok(Self {
            body,
            body_bytes,
            signatures: Vec::new(),
        })
    }

    #[must_use]
    pub fn body(&self) -> &TransactionBody { &self.body }

    #[must_use]
    pub fn transaction_id(&self) -> TransactionId { self.body.transaction_id }

    /// Add a signature by `key`. Signing twice with one key is a no-op.
    #[must_use]
    pub fn sign(mut self, key: &PrivateKey) -> Self {
        let public_key = key.public_key();
        if !self.is_signed_by(&public_key) {
            let signature = key.sign(&self.body_bytes);
            self.signatures.push(SignaturePair {
                public_key,
                signature,
            });
        }
        self
    }

    /// Sign with each key in turn.
    #[must_use]
    pub fn sign_all<'a>(self, keys: impl IntoIterator<Item = &'a PrivateKey>) -> Self {
        keys.into_iter().fold(self, Self::sign)
    }

    #[must_use]
    pub fn is_signed_by(&self, key: &PublicKey) -> bool {
        self.signatures.iter().any(|pair| pair.public_key == *key)
    }

    /// Submit the transaction.
    ///
    /// The client's operator signs first when it is the payer and has not
    /// signed yet.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Precheck`] when the network refuses the
    /// transaction before consensus.
    pub async fn execute(self, client: &Client) -> Result<TransactionResponse> {
        let transaction_id = self.body.transaction_id;
        let kind = self.body.data.kind();
        let tx = match client.operator() {
            Some(op) if op.account_id == transaction_id.account_id => self.sign(&op.key),
            _ => self,
        };
        info!(%transaction_id, %kind, signatures = tx.signatures.len(), "submitting transaction");
        client
            .network()
            .submit(SignedTransaction {
                body_bytes: tx.body_bytes,
                signatures: tx.signatures,
            })
            .await?;
        Ok(TransactionResponse { transaction_id })
    }
}

/// Handle to a submitted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionResponse {
    pub transaction_id: TransactionId,
}

impl TransactionResponse {
    /// Wait for the receipt and require it to report success.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ReceiptStatus`] when the transaction failed and
    /// [`LedgerError::ReceiptTimeout`] when no receipt arrives in time.
    pub async fn get_receipt(&self, client: &Client) -> Result<TransactionReceipt> {
        let receipt = self.get_receipt_unchecked(client).await?;
        if receipt.status.is_success() {
            Ok(receipt)
        } else {
            Err(LedgerError::ReceiptStatus {
                transaction_id: self.transaction_id,
                status: receipt.status,
            })
        }
    }

    /// Wait for the receipt whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ReceiptTimeout`] when no receipt arrives in
    /// time.
    pub async fn get_receipt_unchecked(&self, client: &Client) -> Result<TransactionReceipt> {
        client.poll_receipt(&self.transaction_id).await
    }

    /// Wait for consensus, then fetch the full record.
    ///
    /// # Errors
    ///
    /// As [`TransactionResponse::get_receipt_unchecked`], plus
    /// [`LedgerError::Query`] when the record is unavailable.
    pub async fn get_record(&self, client: &Client) -> Result<TransactionRecord> {
        self.get_receipt_unchecked(client).await?;
        crate::query::TransactionRecordQuery::new()
            .transaction_id(self.transaction_id)
            .execute(client)
            .await
    }
}

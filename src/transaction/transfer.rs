//! Crypto and token transfers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{TransactionData, TransactionKindData, TransferTransaction};
use crate::{
    hbar::Hbar,
    id::{AccountId, TokenId},
};

/// A signed hbar movement for one account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HbarTransfer {
    pub account_id: AccountId,
    pub amount: Hbar,
}

/// A signed token movement for one account; negative amounts debit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub token_id: TokenId,
    pub account_id: AccountId,
    pub amount: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferData {
    pub hbar_transfers: Vec<HbarTransfer>,
    pub token_transfers: Vec<TokenTransfer>,
}

impl TransferData {
    /// Hbar amounts per account, with repeated entries summed.
    #[must_use]
    pub fn net_hbar(&self) -> BTreeMap<AccountId, i64> {
        let mut net = BTreeMap::new();
        for t in &self.hbar_transfers {
            *net.entry(t.account_id).or_insert(0i64) += t.amount.to_tinybars();
        }
        net
    }

    /// Token amounts per token and account, with repeated entries summed.
    #[must_use]
    pub fn net_tokens(&self) -> BTreeMap<TokenId, BTreeMap<AccountId, i64>> {
        let mut net: BTreeMap<TokenId, BTreeMap<AccountId, i64>> = BTreeMap::new();
        for t in &self.token_transfers {
            *net.entry(t.token_id).or_default().entry(t.account_id).or_insert(0) += t.amount;
        }
        net
    }
}

impl From<TransferData> for TransactionData {
    fn from(data: TransferData) -> Self { Self::Transfer(data) }
}

impl TransactionKindData for TransferData {}

impl TransferTransaction {
    #[must_use]
    pub fn hbar_transfer(mut self, account_id: AccountId, amount: Hbar) -> Self {
        self.data.hbar_transfers.push(HbarTransfer { account_id, amount });
        self
    }

    #[must_use]
    pub fn token_transfer(mut self, token_id: TokenId, account_id: AccountId, amount: i64) -> Self {
        self.data.token_transfers.push(TokenTransfer {
            token_id,
            account_id,
            amount,
        });
        self
    }
}

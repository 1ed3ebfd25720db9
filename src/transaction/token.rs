//! Token service transactions.

use serde::{Deserialize, Serialize};

use super::{
    TokenAssociateTransaction,
    TokenCreateTransaction,
    TokenMintTransaction,
    TransactionData,
    TransactionKindData,
};
use crate::{
    client::ClientError,
    id::{AccountId, TokenId},
    key::Key,
};

/// Whether a token's supply is capped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenSupplyType {
    #[default]
    Infinite,
    /// Supply may never exceed the token's `max_supply`.
    Finite,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreateData {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub initial_supply: u64,
    pub treasury_account_id: Option<AccountId>,
    pub admin_key: Option<Key>,
    pub supply_key: Option<Key>,
    pub supply_type: TokenSupplyType,
    pub max_supply: u64,
}

impl From<TokenCreateData> for TransactionData {
    fn from(data: TokenCreateData) -> Self { Self::TokenCreate(data) }
}

impl TransactionKindData for TokenCreateData {
    fn validate(&self) -> Result<(), ClientError> {
        self.treasury_account_id
            .map(|_| ())
            .ok_or(ClientError::MissingField("treasury_account_id"))
    }
}

impl TokenCreateTransaction {
    #[must_use]
    pub fn token_name(mut self, name: impl Into<String>) -> Self {
        self.data.name = name.into();
        self
    }

    #[must_use]
    pub fn token_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.data.symbol = symbol.into();
        self
    }

    #[must_use]
    pub fn decimals(mut self, decimals: u32) -> Self {
        self.data.decimals = decimals;
        self
    }

    /// Units credited to the treasury at creation.
    #[must_use]
    pub fn initial_supply(mut self, supply: u64) -> Self {
        self.data.initial_supply = supply;
        self
    }

    #[must_use]
    pub fn treasury_account_id(mut self, account_id: AccountId) -> Self {
        self.data.treasury_account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn admin_key(mut self, key: impl Into<Key>) -> Self {
        self.data.admin_key = Some(key.into());
        self
    }

    /// Key that must sign mints. Tokens without one can never be minted.
    #[must_use]
    pub fn supply_key(mut self, key: impl Into<Key>) -> Self {
        self.data.supply_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn supply_type(mut self, supply_type: TokenSupplyType) -> Self {
        self.data.supply_type = supply_type;
        self
    }

    #[must_use]
    pub fn max_supply(mut self, max_supply: u64) -> Self {
        self.data.max_supply = max_supply;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMintData {
    pub token_id: Option<TokenId>,
    pub amount: u64,
}

impl From<TokenMintData> for TransactionData {
    fn from(data: TokenMintData) -> Self { Self::TokenMint(data) }
}

impl TransactionKindData for TokenMintData {
    fn validate(&self) -> Result<(), ClientError> {
        self.token_id.map(|_| ()).ok_or(ClientError::MissingField("token_id"))
    }
}

impl TokenMintTransaction {
    #[must_use]
    pub fn token_id(mut self, token_id: TokenId) -> Self {
        self.data.token_id = Some(token_id);
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: u64) -> Self {
        self.data.amount = amount;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAssociateData {
    pub account_id: Option<AccountId>,
    pub token_ids: Vec<TokenId>,
}

impl From<TokenAssociateData> for TransactionData {
    fn from(data: TokenAssociateData) -> Self { Self::TokenAssociate(data) }
}

impl TransactionKindData for TokenAssociateData {
    fn validate(&self) -> Result<(), ClientError> {
        self.account_id.map(|_| ()).ok_or(ClientError::MissingField("account_id"))
    }
}

impl TokenAssociateTransaction {
    #[must_use]
    pub fn account_id(mut self, account_id: AccountId) -> Self {
        self.data.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn token_ids(mut self, token_ids: impl IntoIterator<Item = TokenId>) -> Self {
        self.data.token_ids = token_ids.into_iter().collect();
        self
    }
}

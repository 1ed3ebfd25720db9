//! Ledger state and the rules applied at consensus.

use std::collections::{BTreeMap, HashSet};

use bytes::Bytes;
use sha2::{Digest, Sha384};
use tokio::sync::broadcast;

use super::FeeSchedule;
use crate::{
    hbar::Hbar,
    id::{AccountId, Timestamp, TokenId, TopicId},
    key::{Key, PublicKey},
    query::{AccountBalance, AccountInfo, TokenInfo, TopicInfo, TopicMessage},
    status::Status,
    transaction::{
        HbarTransfer,
        TokenAssociateData,
        TokenCreateData,
        TokenMintData,
        TokenSupplyType,
        TokenTransfer,
        TopicCreateData,
        TopicMessageSubmitData,
        TransactionBody,
        TransactionData,
        TransactionReceipt,
        TransactionRecord,
        TransferData,
    },
};

/// Largest message a single submission may carry.
pub(super) const MAX_MESSAGE_BYTES: usize = 1024;

const TOPIC_CHANNEL_CAPACITY: usize = 256;
const RUNNING_HASH_BYTES: usize = 48;

type Signers = HashSet<PublicKey>;

#[derive(Debug)]
struct AccountState {
    key: Key,
    balance: i64,
    tokens: BTreeMap<TokenId, u64>,
}

#[derive(Debug)]
struct TopicState {
    info: TopicInfo,
    messages: Vec<TopicMessage>,
    feed: broadcast::Sender<TopicMessage>,
}

#[derive(Debug)]
pub(super) struct Ledger {
    accounts: BTreeMap<AccountId, AccountState>,
    tokens: BTreeMap<TokenId, TokenInfo>,
    topics: BTreeMap<TopicId, TopicState>,
    next_entity: u64,
    last_consensus: Timestamp,
}

impl Ledger {
    pub(super) fn new(genesis: Vec<(AccountId, Key, Hbar)>) -> Self {
        let next_entity = genesis.iter().map(|(id, _, _)| id.num).max().unwrap_or(1000) + 1;
        let accounts = genesis
            .into_iter()
            .map(|(id, key, balance)| {
                let state = AccountState {
                    key,
                    balance: balance.to_tinybars(),
                    tokens: BTreeMap::new(),
                };
                (id, state)
            })
            .collect();
        Self {
            accounts,
            tokens: BTreeMap::new(),
            topics: BTreeMap::new(),
            next_entity,
            last_consensus: Timestamp::EPOCH,
        }
    }

    /// Apply one transaction.
    ///
    /// `Err` carries a precheck failure: nothing was charged or changed.
    /// Otherwise the fee has been charged and the record reports the outcome.
    pub(super) fn process(
        &mut self,
        body: &TransactionBody,
        signers: &Signers,
        fees: &FeeSchedule,
    ) -> Result<TransactionRecord, Status> {
        let transaction_id = body.transaction_id;
        let fee = fees.fee_for(body.data.kind());
        if fee > body.max_transaction_fee {
            return Err(Status::InsufficientTxFee);
        }
        let payer = self
            .accounts
            .get_mut(&transaction_id.account_id)
            .ok_or(Status::InvalidAccountId)?;
        if !payer.key.is_satisfied_by(signers) {
            return Err(Status::InvalidSignature);
        }
        if payer.balance < fee.to_tinybars() {
            return Err(Status::InsufficientPayerBalance);
        }
        payer.balance -= fee.to_tinybars();

        let consensus_timestamp = self.tick();
        let mut record = TransactionRecord {
            receipt: TransactionReceipt::new(transaction_id, Status::Success),
            transaction_id,
            consensus_timestamp,
            transaction_fee: fee,
            transaction_memo: body.memo.clone(),
            hbar_transfers: Vec::new(),
            token_transfers: Vec::new(),
        };
        let outcome = match &body.data {
            TransactionData::TopicCreate(data) => self.create_topic(data, signers, &mut record),
            TransactionData::TopicMessageSubmit(data) => self.submit_message(data, signers, &mut record),
            TransactionData::TokenCreate(data) => self.create_token(data, signers, &mut record),
            TransactionData::TokenMint(data) => self.mint(data, signers, &mut record),
            TransactionData::TokenAssociate(data) => self.associate(data, signers),
            TransactionData::Transfer(data) => self.transfer(data, signers, &mut record),
        };
        if let Err(status) = outcome {
            record.receipt = TransactionReceipt::new(transaction_id, status);
            record.hbar_transfers.clear();
            record.token_transfers.clear();
        }
        Ok(record)
    }

    fn tick(&mut self) -> Timestamp {
        self.last_consensus = Timestamp::now().max(self.last_consensus.next());
        self.last_consensus
    }

    fn allocate(&mut self) -> u64 {
        let num = self.next_entity;
        self.next_entity += 1;
        num
    }

    fn create_topic(&mut self, data: &TopicCreateData, signers: &Signers, record: &mut TransactionRecord) -> Result<(), Status> {
        require(data.admin_key.as_ref(), signers)?;
        if let Some(account_id) = &data.auto_renew_account_id {
            self.account(account_id)?;
        }
        let topic_id = TopicId::new(0, 0, self.allocate());
        let (feed, _) = broadcast::channel(TOPIC_CHANNEL_CAPACITY);
        let info = TopicInfo {
            topic_id,
            topic_memo: data.memo.clone(),
            sequence_number: 0,
            running_hash: vec![0; RUNNING_HASH_BYTES],
            admin_key: data.admin_key.clone(),
            submit_key: data.submit_key.clone(),
            auto_renew_account_id: data.auto_renew_account_id,
            auto_renew_period: data.auto_renew_period,
        };
        self.topics.insert(topic_id, TopicState {
            info,
            messages: Vec::new(),
            feed,
        });
        record.receipt.topic_id = Some(topic_id);
        Ok(())
    }

    fn submit_message(
        &mut self,
        data: &TopicMessageSubmitData,
        signers: &Signers,
        record: &mut TransactionRecord,
    ) -> Result<(), Status> {
        let topic_id = data.topic_id.ok_or(Status::InvalidTopicId)?;
        let topic = self.topics.get_mut(&topic_id).ok_or(Status::InvalidTopicId)?;
        require(topic.info.submit_key.as_ref(), signers)?;
        if data.message.is_empty() {
            return Err(Status::InvalidTopicMessage);
        }
        if data.message.len() > MAX_MESSAGE_BYTES {
            return Err(Status::MessageSizeTooLarge);
        }
        let sequence_number = topic.info.sequence_number + 1;
        let running_hash = Sha384::new()
            .chain_update(&topic.info.running_hash)
            .chain_update(topic_id.shard.to_be_bytes())
            .chain_update(topic_id.realm.to_be_bytes())
            .chain_update(topic_id.num.to_be_bytes())
            .chain_update(record.consensus_timestamp.as_nanos().to_be_bytes())
            .chain_update(sequence_number.to_be_bytes())
            .chain_update(&data.message)
            .finalize()
            .to_vec();
        let message = TopicMessage {
            topic_id,
            sequence_number,
            consensus_timestamp: record.consensus_timestamp,
            contents: Bytes::copy_from_slice(&data.message),
            running_hash: running_hash.clone(),
        };
        topic.info.sequence_number = sequence_number;
        topic.info.running_hash.clone_from(&running_hash);
        topic.messages.push(message.clone());
        // No subscribers is not an error.
        let _ = topic.feed.send(message);
        record.receipt.topic_sequence_number = sequence_number;
        record.receipt.topic_running_hash = Some(running_hash);
        Ok(())
    }

    fn create_token(&mut self, data: &TokenCreateData, signers: &Signers, record: &mut TransactionRecord) -> Result<(), Status> {
        if data.name.trim().is_empty() {
            return Err(Status::MissingTokenName);
        }
        if data.symbol.trim().is_empty() {
            return Err(Status::MissingTokenSymbol);
        }
        let treasury_id = data.treasury_account_id.ok_or(Status::InvalidAccountId)?;
        let treasury = self.account(&treasury_id)?;
        if !treasury.key.is_satisfied_by(signers) {
            return Err(Status::InvalidSignature);
        }
        require(data.admin_key.as_ref(), signers)?;
        match data.supply_type {
            TokenSupplyType::Finite if data.max_supply == 0 => return Err(Status::InvalidTokenMaxSupply),
            TokenSupplyType::Finite if data.initial_supply > data.max_supply => {
                return Err(Status::InvalidTokenInitialSupply);
            }
            TokenSupplyType::Infinite if data.max_supply != 0 => return Err(Status::InvalidTokenMaxSupply),
            _ => {}
        }
        if i64::try_from(data.initial_supply).is_err() {
            return Err(Status::InvalidTokenInitialSupply);
        }

        let token_id = TokenId::new(0, 0, self.allocate());
        self.tokens.insert(token_id, TokenInfo {
            token_id,
            name: data.name.clone(),
            symbol: data.symbol.clone(),
            decimals: data.decimals,
            total_supply: data.initial_supply,
            treasury_account_id: treasury_id,
            admin_key: data.admin_key.clone(),
            supply_key: data.supply_key.clone(),
            supply_type: data.supply_type,
            max_supply: data.max_supply,
        });
        self.account_mut(&treasury_id)?.tokens.insert(token_id, data.initial_supply);
        record.receipt.token_id = Some(token_id);
        if data.initial_supply > 0 {
            record.token_transfers.push(TokenTransfer {
                token_id,
                account_id: treasury_id,
                amount: i64::try_from(data.initial_supply).unwrap_or(i64::MAX),
            });
        }
        Ok(())
    }

    fn mint(&mut self, data: &TokenMintData, signers: &Signers, record: &mut TransactionRecord) -> Result<(), Status> {
        let token_id = data.token_id.ok_or(Status::InvalidTokenId)?;
        let token = self.tokens.get(&token_id).ok_or(Status::InvalidTokenId)?;
        let supply_key = token.supply_key.as_ref().ok_or(Status::TokenHasNoSupplyKey)?;
        if !supply_key.is_satisfied_by(signers) {
            return Err(Status::InvalidSignature);
        }
        let amount = i64::try_from(data.amount)
            .ok()
            .filter(|a| *a > 0)
            .ok_or(Status::InvalidTokenMintAmount)?;
        let total_supply = token
            .total_supply
            .checked_add(data.amount)
            .filter(|t| i64::try_from(*t).is_ok())
            .ok_or(Status::InvalidTokenMintAmount)?;
        if token.supply_type == TokenSupplyType::Finite && total_supply > token.max_supply {
            return Err(Status::TokenMaxSupplyReached);
        }
        let treasury_id = token.treasury_account_id;

        let treasury = self.account_mut(&treasury_id)?;
        *treasury.tokens.entry(token_id).or_insert(0) += data.amount;
        if let Some(token) = self.tokens.get_mut(&token_id) {
            token.total_supply = total_supply;
        }
        record.receipt.total_supply = total_supply;
        record.token_transfers.push(TokenTransfer {
            token_id,
            account_id: treasury_id,
            amount,
        });
        Ok(())
    }

    fn associate(&mut self, data: &TokenAssociateData, signers: &Signers) -> Result<(), Status> {
        let account_id = data.account_id.ok_or(Status::InvalidAccountId)?;
        let account = self.account(&account_id)?;
        if !account.key.is_satisfied_by(signers) {
            return Err(Status::InvalidSignature);
        }
        for token_id in &data.token_ids {
            if !self.tokens.contains_key(token_id) {
                return Err(Status::InvalidTokenId);
            }
            if account.tokens.contains_key(token_id) {
                return Err(Status::TokenAlreadyAssociatedToAccount);
            }
        }
        let account = self.account_mut(&account_id)?;
        for token_id in &data.token_ids {
            account.tokens.insert(*token_id, 0);
        }
        Ok(())
    }

    /// Validate every leg, then apply them all.
    fn transfer(&mut self, data: &TransferData, signers: &Signers, record: &mut TransactionRecord) -> Result<(), Status> {
        let hbar = data.net_hbar();
        let tokens = data.net_tokens();
        if hbar.is_empty() && tokens.is_empty() {
            return Err(Status::InvalidAccountAmounts);
        }
        if hbar.values().try_fold(0i64, |sum, v| sum.checked_add(*v)) != Some(0) {
            return Err(Status::InvalidAccountAmounts);
        }
        for (token_id, legs) in &tokens {
            if !self.tokens.contains_key(token_id) {
                return Err(Status::InvalidTokenId);
            }
            if legs.values().try_fold(0i64, |sum, v| sum.checked_add(*v)) != Some(0) {
                return Err(Status::TransfersNotZeroSumForToken);
            }
        }

        for (account_id, amount) in &hbar {
            let account = self.account(account_id)?;
            if *amount < 0 && !account.key.is_satisfied_by(signers) {
                return Err(Status::InvalidSignature);
            }
            if account.balance.checked_add(*amount).is_none_or(|b| b < 0) {
                return Err(Status::InsufficientAccountBalance);
            }
        }
        for (token_id, legs) in &tokens {
            for (account_id, amount) in legs {
                let account = self.account(account_id)?;
                if *amount < 0 && !account.key.is_satisfied_by(signers) {
                    return Err(Status::InvalidSignature);
                }
                let Some(balance) = account.tokens.get(token_id) else {
                    return Err(Status::TokenNotAssociatedToAccount);
                };
                let sufficient = i64::try_from(*balance)
                    .ok()
                    .and_then(|b| b.checked_add(*amount))
                    .is_some_and(|b| b >= 0);
                if !sufficient {
                    return Err(Status::InsufficientTokenBalance);
                }
            }
        }

        for (account_id, amount) in &hbar {
            self.account_mut(account_id)?.balance += amount;
            if *amount != 0 {
                record.hbar_transfers.push(HbarTransfer {
                    account_id: *account_id,
                    amount: Hbar::from_tinybars(*amount),
                });
            }
        }
        for (token_id, legs) in &tokens {
            for (account_id, amount) in legs {
                let balance = self
                    .account_mut(account_id)?
                    .tokens
                    .get_mut(token_id)
                    .ok_or(Status::TokenNotAssociatedToAccount)?;
                *balance = balance.saturating_add_signed(*amount);
                if *amount != 0 {
                    record.token_transfers.push(TokenTransfer {
                        token_id: *token_id,
                        account_id: *account_id,
                        amount: *amount,
                    });
                }
            }
        }
        Ok(())
    }

    fn account(&self, account_id: &AccountId) -> Result<&AccountState, Status> {
        self.accounts.get(account_id).ok_or(Status::InvalidAccountId)
    }

    fn account_mut(&mut self, account_id: &AccountId) -> Result<&mut AccountState, Status> {
        self.accounts.get_mut(account_id).ok_or(Status::InvalidAccountId)
    }

    pub(super) fn account_balance(&self, account_id: &AccountId) -> Result<AccountBalance, Status> {
        let account = self.account(account_id)?;
        Ok(AccountBalance {
            account_id: *account_id,
            hbars: Hbar::from_tinybars(account.balance),
            tokens: account.tokens.clone(),
        })
    }

    pub(super) fn account_info(&self, account_id: &AccountId) -> Result<AccountInfo, Status> {
        let account = self.account(account_id)?;
        Ok(AccountInfo {
            account_id: *account_id,
            key: account.key.clone(),
            balance: Hbar::from_tinybars(account.balance),
            associated_tokens: account.tokens.keys().copied().collect(),
        })
    }

    pub(super) fn token_info(&self, token_id: &TokenId) -> Result<TokenInfo, Status> {
        self.tokens.get(token_id).cloned().ok_or(Status::InvalidTokenId)
    }

    pub(super) fn topic_info(&self, topic_id: &TopicId) -> Result<TopicInfo, Status> {
        self.topics
            .get(topic_id)
            .map(|topic| topic.info.clone())
            .ok_or(Status::InvalidTopicId)
    }

    /// Register a live receiver, then capture history from `start_time`.
    pub(super) fn subscribe(
        &self,
        topic_id: &TopicId,
        start_time: Timestamp,
    ) -> Result<(Vec<TopicMessage>, broadcast::Receiver<TopicMessage>), Status> {
        let topic = self.topics.get(topic_id).ok_or(Status::InvalidTopicId)?;
        let live = topic.feed.subscribe();
        let backlog = topic
            .messages
            .iter()
            .filter(|m| m.consensus_timestamp >= start_time)
            .cloned()
            .collect();
        Ok((backlog, live))
    }
}

/// An optional key, when present, must be satisfied.
fn require(key: Option<&Key>, signers: &Signers) -> Result<(), Status> {
    match key {
        Some(key) if !key.is_satisfied_by(signers) => Err(Status::InvalidSignature),
        _ => Ok(()),
    }
}

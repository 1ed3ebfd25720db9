//! Consensus topic transactions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{TopicCreateTransaction, TopicMessageSubmitTransaction, TransactionData, TransactionKindData};
use crate::{
    client::ClientError,
    id::{AccountId, TopicId},
    key::Key,
};

/// Auto-renew period applied when none is set (about 91 days).
pub const DEFAULT_AUTO_RENEW_PERIOD: Duration = Duration::from_secs(7_890_000);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCreateData {
    pub memo: String,
    pub admin_key: Option<Key>,
    pub submit_key: Option<Key>,
    pub auto_renew_account_id: Option<AccountId>,
    pub auto_renew_period: Duration,
}

impl Default for TopicCreateData {
    fn default() -> Self {
        Self {
            memo: String::new(),
            admin_key: None,
            submit_key: None,
            auto_renew_account_id: None,
            auto_renew_period: DEFAULT_AUTO_RENEW_PERIOD,
        }
    }
}

impl From<TopicCreateData> for TransactionData {
    fn from(data: TopicCreateData) -> Self { Self::TopicCreate(data) }
}

impl TransactionKindData for TopicCreateData {}

impl TopicCreateTransaction {
    #[must_use]
    pub fn topic_memo(mut self, memo: impl Into<String>) -> Self {
        self.data.memo = memo.into();
        self
    }

    /// Key that must sign updates and deletion of the topic.
    #[must_use]
    pub fn admin_key(mut self, key: impl Into<Key>) -> Self {
        self.data.admin_key = Some(key.into());
        self
    }

    /// Key that must sign every message; an open topic has none.
    #[must_use]
    pub fn submit_key(mut self, key: impl Into<Key>) -> Self {
        self.data.submit_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn auto_renew_account_id(mut self, account_id: AccountId) -> Self {
        self.data.auto_renew_account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn auto_renew_period(mut self, period: Duration) -> Self {
        self.data.auto_renew_period = period;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMessageSubmitData {
    pub topic_id: Option<TopicId>,
    pub message: Vec<u8>,
}

impl From<TopicMessageSubmitData> for TransactionData {
    fn from(data: TopicMessageSubmitData) -> Self { Self::TopicMessageSubmit(data) }
}

impl TransactionKindData for TopicMessageSubmitData {
    fn validate(&self) -> Result<(), ClientError> {
        self.topic_id.map(|_| ()).ok_or(ClientError::MissingField("topic_id"))
    }
}

impl TopicMessageSubmitTransaction {
    #[must_use]
    pub fn topic_id(mut self, topic_id: TopicId) -> Self {
        self.data.topic_id = Some(topic_id);
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<Vec<u8>>) -> Self {
        self.data.message = message.into();
        self
    }
}
